//! Document import service
//!
//! The review step between detection and storage: detected candidates are
//! previewed against existing history, and only confirmed new rows are
//! persisted.

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::detection::TransactionDetector;
use crate::error::{SpendError, SpendResult};
use crate::extraction;
use crate::models::{CandidateTransaction, TagId, TransactionId};
use crate::services::{CreateTransactionInput, TransactionService};
use crate::storage::Storage;

/// Import ID for a candidate, stable across re-imports of the same document
///
/// `occurrence` distinguishes identical lines within one document so that two
/// genuine identical purchases are both kept.
pub fn generate_import_id(candidate: &CandidateTransaction, occurrence: usize) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    candidate.date.hash(&mut hasher);
    candidate.amount.cents().hash(&mut hasher);
    candidate.currency.hash(&mut hasher);
    candidate.description.trim().to_lowercase().hash(&mut hasher);
    occurrence.hash(&mut hasher);
    format!("imp-{:016x}", hasher.finish())
}

/// Status of a candidate in the import preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    /// Will be imported
    New,
    /// Already stored; will be skipped
    Duplicate,
}

/// Preview entry for import review
#[derive(Debug, Clone, Serialize)]
pub struct ImportPreviewEntry {
    pub candidate: CandidateTransaction,
    pub status: ImportStatus,
    pub import_id: String,
    pub source_file: Option<String>,
    /// Matching stored transaction (for duplicates)
    pub existing_id: Option<TransactionId>,
}

/// Choices made by the user when confirming an import
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Category applied to every imported row
    pub category: Option<String>,
    /// Tags attached to every imported row; they must already exist
    pub tags: Vec<TagId>,
    /// Keep the zero-amount placeholder emitted when nothing was detected
    pub keep_placeholders: bool,
}

/// Result of a completed import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub placeholders_skipped: usize,
    pub imported_ids: Vec<TransactionId>,
}

/// Service for importing detected transactions
pub struct ImportService<'a> {
    storage: &'a Storage,
    detector: TransactionDetector,
}

impl<'a> ImportService<'a> {
    /// Create a new import service with the default detector
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            detector: TransactionDetector::new(),
        }
    }

    /// Use a configured detector (default currency, fixed "today")
    pub fn with_detector(mut self, detector: TransactionDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Extract a document and preview its candidates
    pub fn preview_file(&self, path: &Path) -> SpendResult<Vec<ImportPreviewEntry>> {
        let text = extraction::extract_text(path)?;
        let source_file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self.preview(&text, source_file.as_deref())
    }

    /// Detect candidates in `text` and mark each one new or duplicate
    pub fn preview(
        &self,
        text: &str,
        source_file: Option<&str>,
    ) -> SpendResult<Vec<ImportPreviewEntry>> {
        let candidates = self.detector.detect(text);

        let mut occurrences: HashMap<(String, String), usize> = HashMap::new();
        let mut preview = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let key = (
                format!("{}|{}|{}", candidate.date, candidate.amount.cents(), candidate.currency),
                candidate.description.trim().to_lowercase(),
            );
            let occurrence = occurrences.entry(key).or_insert(0);
            let import_id = generate_import_id(&candidate, *occurrence);
            *occurrence += 1;

            let existing_id = self
                .storage
                .transactions
                .find_by_import_id(&import_id)?
                .map(|t| t.id);
            let status = if existing_id.is_some() {
                ImportStatus::Duplicate
            } else {
                ImportStatus::New
            };

            preview.push(ImportPreviewEntry {
                candidate,
                status,
                import_id,
                source_file: source_file.map(str::to_string),
                existing_id,
            });
        }

        debug!(
            candidates = preview.len(),
            duplicates = preview.iter().filter(|e| e.status == ImportStatus::Duplicate).count(),
            "built import preview"
        );
        Ok(preview)
    }

    /// Persist the new entries of a preview
    pub fn import(
        &self,
        preview: &[ImportPreviewEntry],
        options: &ImportOptions,
    ) -> SpendResult<ImportResult> {
        for tag in &options.tags {
            if self.storage.tags.get(*tag)?.is_none() {
                return Err(SpendError::tag_not_found(tag.to_string()));
            }
        }

        let txn_service = TransactionService::new(self.storage);
        let mut result = ImportResult::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for entry in preview {
            if entry.status == ImportStatus::Duplicate || !seen.insert(entry.import_id.as_str()) {
                result.duplicates_skipped += 1;
                continue;
            }
            if entry.candidate.is_placeholder() && !options.keep_placeholders {
                result.placeholders_skipped += 1;
                continue;
            }

            let mut input = CreateTransactionInput::new(
                entry.candidate.date,
                entry.candidate.amount,
                entry.candidate.currency.clone(),
            );
            input.description = Some(entry.candidate.description.clone());
            input.category = options.category.clone();
            input.source_file = entry.source_file.clone();
            input.import_id = Some(entry.import_id.clone());

            let mut txn = txn_service.build(input)?;
            for tag in &options.tags {
                txn.add_tag(*tag);
            }
            result.imported_ids.push(txn.id);
            self.storage.transactions.upsert(txn)?;
            result.imported += 1;
        }

        self.storage.transactions.save()?;

        info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            placeholders = result.placeholders_skipped,
            "import complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpendPaths;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn service(storage: &Storage) -> ImportService<'_> {
        ImportService::new(storage)
            .with_detector(TransactionDetector::new().with_today(today()))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    const RECEIPT: &str = "12/03/2024\nLunch RM 45.00\nParking RM 3.00";

    #[test]
    fn test_preview_then_import() {
        let (_temp_dir, storage) = create_test_storage();
        let service = service(&storage);

        let preview = service.preview(RECEIPT, Some("receipt.txt")).unwrap();
        assert_eq!(preview.len(), 2);
        assert!(preview.iter().all(|e| e.status == ImportStatus::New));

        let options = ImportOptions {
            category: Some("Food".into()),
            ..Default::default()
        };
        let result = service.import(&preview, &options).unwrap();
        assert_eq!(result.imported, 2);

        let stored = storage.transactions.get_all().unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|t| t.category_name() == "Food"));
        assert!(stored.iter().all(|t| t.source_file.as_deref() == Some("receipt.txt")));
    }

    #[test]
    fn test_import_attaches_tags_to_every_row() {
        let (_temp_dir, storage) = create_test_storage();
        let service = service(&storage);
        let tags = crate::services::TagService::new(&storage);
        let trip = tags.create("work trip").unwrap();
        let claim = tags.create("reimbursable").unwrap();

        let preview = service.preview(RECEIPT, None).unwrap();
        let options = ImportOptions {
            tags: vec![trip.id, claim.id],
            ..Default::default()
        };
        let result = service.import(&preview, &options).unwrap();
        assert_eq!(result.imported, 2);

        let stored = storage.transactions.get_all().unwrap();
        assert!(stored.iter().all(|t| t.tags == vec![trip.id, claim.id]));
    }

    #[test]
    fn test_import_with_unknown_tag_saves_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = service(&storage);

        let preview = service.preview(RECEIPT, None).unwrap();
        let options = ImportOptions {
            tags: vec![TagId::new()],
            ..Default::default()
        };
        assert!(service.import(&preview, &options).unwrap_err().is_not_found());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_reimport_marks_duplicates() {
        let (_temp_dir, storage) = create_test_storage();
        let service = service(&storage);

        let preview = service.preview(RECEIPT, None).unwrap();
        service.import(&preview, &ImportOptions::default()).unwrap();

        let again = service.preview(RECEIPT, None).unwrap();
        assert!(again.iter().all(|e| e.status == ImportStatus::Duplicate));
        assert!(again.iter().all(|e| e.existing_id.is_some()));

        let result = service.import(&again, &ImportOptions::default()).unwrap();
        assert_eq!(result.imported, 0);
        assert_eq!(result.duplicates_skipped, 2);
        assert_eq!(storage.transactions.count().unwrap(), 2);
    }

    #[test]
    fn test_identical_lines_in_one_document_are_both_kept() {
        let (_temp_dir, storage) = create_test_storage();
        let service = service(&storage);

        let preview = service
            .preview("01/03/2024\nCoffee RM 3.00\nCoffee RM 3.00", None)
            .unwrap();
        assert_ne!(preview[0].import_id, preview[1].import_id);

        let result = service.import(&preview, &ImportOptions::default()).unwrap();
        assert_eq!(result.imported, 2);
    }

    #[test]
    fn test_placeholder_skipped_unless_kept() {
        let (_temp_dir, storage) = create_test_storage();
        let service = service(&storage);

        let preview = service.preview("nothing to see here", None).unwrap();
        assert_eq!(preview.len(), 1);
        assert!(preview[0].candidate.is_placeholder());

        let result = service.import(&preview, &ImportOptions::default()).unwrap();
        assert_eq!(result.imported, 0);
        assert_eq!(result.placeholders_skipped, 1);

        let keep = ImportOptions {
            keep_placeholders: true,
            ..Default::default()
        };
        let result = service.import(&preview, &keep).unwrap();
        assert_eq!(result.imported, 1);

        let stored = storage.transactions.get_all().unwrap();
        assert_eq!(stored[0].date, today());
        assert!(stored[0].amount.is_zero());
    }

    #[test]
    fn test_preview_file_records_file_name() {
        let (temp_dir, storage) = create_test_storage();
        let path = temp_dir.path().join("march.txt");
        std::fs::write(&path, RECEIPT).unwrap();

        let preview = service(&storage).preview_file(&path).unwrap();
        assert_eq!(preview[0].source_file.as_deref(), Some("march.txt"));
    }
}
