//! Tag service
//!
//! Create, rename and delete tags, and attach them to transactions. Tag names
//! are unique ignoring case.

use tracing::info;

use crate::error::{SpendError, SpendResult};
use crate::models::{Tag, TagId, Transaction, TransactionId};
use crate::storage::Storage;

/// Service for tag management
pub struct TagService<'a> {
    storage: &'a Storage,
}

impl<'a> TagService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new tag
    pub fn create(&self, name: &str) -> SpendResult<Tag> {
        let tag = Tag::new(name);
        tag.validate()
            .map_err(|e| SpendError::Validation(e.to_string()))?;
        self.ensure_unique(&tag)?;

        self.storage.tags.upsert(tag.clone())?;
        self.storage.tags.save()?;

        info!(id = %tag.id, name = %tag.name, "created tag");
        Ok(tag)
    }

    /// Rename a tag
    pub fn rename(&self, id: TagId, name: &str) -> SpendResult<Tag> {
        let mut tag = self
            .storage
            .tags
            .get(id)?
            .ok_or_else(|| SpendError::tag_not_found(id.to_string()))?;

        tag.rename(name);
        tag.validate()
            .map_err(|e| SpendError::Validation(e.to_string()))?;
        self.ensure_unique(&tag)?;

        self.storage.tags.upsert(tag.clone())?;
        self.storage.tags.save()?;

        info!(id = %tag.id, name = %tag.name, "renamed tag");
        Ok(tag)
    }

    /// Delete a tag and detach it from every transaction
    pub fn delete(&self, id: TagId) -> SpendResult<Tag> {
        let tag = self
            .storage
            .tags
            .get(id)?
            .ok_or_else(|| SpendError::tag_not_found(id.to_string()))?;

        let mut detached = 0;
        for mut txn in self.storage.transactions.get_all()? {
            if txn.remove_tag(id) {
                self.storage.transactions.upsert(txn)?;
                detached += 1;
            }
        }
        if detached > 0 {
            self.storage.transactions.save()?;
        }

        self.storage.tags.delete(id)?;
        self.storage.tags.save()?;

        info!(id = %id, detached, "deleted tag");
        Ok(tag)
    }

    /// All tags, sorted by name
    pub fn list(&self) -> SpendResult<Vec<Tag>> {
        self.storage.tags.get_all()
    }

    /// Find a tag by ID or by name
    pub fn find(&self, identifier: &str) -> SpendResult<Option<Tag>> {
        if let Ok(id) = identifier.parse::<TagId>() {
            if let Some(tag) = self.storage.tags.get(id)? {
                return Ok(Some(tag));
            }
        }
        self.storage.tags.get_by_name(identifier)
    }

    /// Find a tag or fail with NotFound
    pub fn require(&self, identifier: &str) -> SpendResult<Tag> {
        self.find(identifier)?
            .ok_or_else(|| SpendError::tag_not_found(identifier))
    }

    /// Resolve tag names or IDs, dropping repeats
    pub fn resolve(&self, identifiers: &[String]) -> SpendResult<Vec<TagId>> {
        let mut ids = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let id = self.require(identifier)?.id;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Tags attached to a transaction; links to deleted tags are skipped
    pub fn tags_for_transaction(&self, txn: &Transaction) -> SpendResult<Vec<Tag>> {
        let mut tags = Vec::with_capacity(txn.tags.len());
        for id in &txn.tags {
            if let Some(tag) = self.storage.tags.get(*id)? {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    /// Replace the tags of a transaction
    pub fn set_transaction_tags(
        &self,
        txn_id: TransactionId,
        tag_ids: &[TagId],
    ) -> SpendResult<Transaction> {
        let mut txn = self.require_transaction(txn_id)?;
        self.ensure_tags_exist(tag_ids)?;

        for id in txn.tags.clone() {
            if !tag_ids.contains(&id) {
                txn.remove_tag(id);
            }
        }
        for id in tag_ids {
            txn.add_tag(*id);
        }

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(id = %txn.id, tags = txn.tags.len(), "set transaction tags");
        Ok(txn)
    }

    /// Attach one tag to a transaction
    pub fn add_to_transaction(
        &self,
        txn_id: TransactionId,
        tag_id: TagId,
    ) -> SpendResult<Transaction> {
        let mut txn = self.require_transaction(txn_id)?;
        self.ensure_tags_exist(&[tag_id])?;

        if txn.add_tag(tag_id) {
            self.storage.transactions.upsert(txn.clone())?;
            self.storage.transactions.save()?;
        }
        Ok(txn)
    }

    /// Detach one tag from a transaction
    pub fn remove_from_transaction(
        &self,
        txn_id: TransactionId,
        tag_id: TagId,
    ) -> SpendResult<Transaction> {
        let mut txn = self.require_transaction(txn_id)?;

        if txn.remove_tag(tag_id) {
            self.storage.transactions.upsert(txn.clone())?;
            self.storage.transactions.save()?;
        }
        Ok(txn)
    }

    fn require_transaction(&self, id: TransactionId) -> SpendResult<Transaction> {
        self.storage
            .transactions
            .get(id)?
            .ok_or_else(|| SpendError::transaction_not_found(id.to_string()))
    }

    fn ensure_tags_exist(&self, tag_ids: &[TagId]) -> SpendResult<()> {
        for id in tag_ids {
            if self.storage.tags.get(*id)?.is_none() {
                return Err(SpendError::tag_not_found(id.to_string()));
            }
        }
        Ok(())
    }

    fn ensure_unique(&self, tag: &Tag) -> SpendResult<()> {
        if let Some(existing) = self.storage.tags.get_by_name(&tag.name)? {
            if existing.id != tag.id {
                return Err(SpendError::Duplicate {
                    entity_type: "Tag",
                    identifier: tag.name.clone(),
                });
            }
        }
        Ok(())
    }
}
