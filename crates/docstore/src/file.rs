//! File-backed document store.
//!
//! # Storage Layout
//!
//! ```text
//! <data_dir>/
//! └── <database>/
//!     └── <collection>/
//!         └── 55/              # id[0..2]
//!             └── 0e/          # id[2..4]
//!                 └── 550e8400e29b41d4a716446655440000.json
//! ```
//!
//! Documents are written to a temporary sibling file and renamed into place, so a crashed
//! insert never leaves a half-written document under its final name. Stored documents are
//! immutable: an id that already exists on disk is a write failure.

use crate::store::DocumentStore;
use crate::{DocumentId, StoreError, StoreResult};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DOCUMENT_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// Connection settings for a [`FileStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Stores each document as a JSON file under a sharded directory tree.
///
/// The handle holds only the canonical root path, so it is cheap to share between threads.
#[derive(Clone, Debug)]
pub struct FileStore {
    root_directory: PathBuf,
}

impl FileStore {
    /// Open the store rooted at `config.data_dir()`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if:
    /// - the path exists but is not a directory
    /// - the directory cannot be created
    /// - path canonicalisation fails
    pub fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let data_dir = config.data_dir();

        if data_dir.exists() && !data_dir.is_dir() {
            return Err(StoreError::Connection(format!(
                "Path is not a directory: {}",
                data_dir.display()
            )));
        }

        fs::create_dir_all(data_dir).map_err(|e| {
            StoreError::Connection(format!(
                "Cannot create data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;

        let root_directory = data_dir.canonicalize().map_err(|e| {
            StoreError::Connection(format!(
                "Cannot canonicalize path {}: {}",
                data_dir.display(),
                e
            ))
        })?;

        tracing::debug!("connected to file store at {}", root_directory.display());

        Ok(Self { root_directory })
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    fn collection_dir(&self, database: &str, collection: &str) -> PathBuf {
        self.root_directory.join(database).join(collection)
    }
}

impl DocumentStore for FileStore {
    fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &Value,
    ) -> StoreResult<DocumentId> {
        let id = DocumentId::new();
        let path = id.sharded_file(&self.collection_dir(database, collection));

        if path.exists() {
            return Err(StoreError::Write(format!(
                "document {id} already exists in {database}.{collection}"
            )));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Write(format!(
                    "Failed to create collection directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| StoreError::Write(format!("Failed to serialise document: {e}")))?;

        let temp_path = path.with_extension(TEMP_EXTENSION);
        fs::write(&temp_path, bytes).map_err(|e| {
            StoreError::Write(format!(
                "Failed to write document to {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Write(format!(
                "Failed to move document into {}: {}",
                path.display(),
                e
            )));
        }

        tracing::debug!("inserted {database}.{collection}/{id}");
        Ok(id)
    }

    fn find_document(
        &self,
        database: &str,
        collection: &str,
        id: &DocumentId,
    ) -> StoreResult<Option<Value>> {
        let path = id.sharded_file(&self.collection_dir(database, collection));

        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Read(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        serde_json::from_slice(&contents).map(Some).map_err(|e| {
            StoreError::Read(format!("Stored document {} is not JSON: {}", path.display(), e))
        })
    }

    fn count_documents(&self, database: &str, collection: &str) -> StoreResult<usize> {
        let dir = self.collection_dir(database, collection);
        if !dir.is_dir() {
            return Ok(0);
        }

        let mut count = 0;
        for s1 in list_entries(&dir)? {
            if !s1.is_dir() {
                continue;
            }
            for s2 in list_entries(&s1)? {
                if !s2.is_dir() {
                    continue;
                }
                count += list_entries(&s2)?
                    .iter()
                    .filter(|path| is_document_file(path))
                    .count();
            }
        }

        Ok(count)
    }
}

/// Paths of every entry in `dir`. Errors on the listing or on any single entry are returned.
fn list_entries(dir: &Path) -> StoreResult<Vec<PathBuf>> {
    let list_error =
        |e: std::io::Error| StoreError::Read(format!("Failed to list {}: {}", dir.display(), e));

    fs::read_dir(dir)
        .map_err(list_error)?
        .map(|entry| entry.map(|entry| entry.path()).map_err(list_error))
        .collect()
}

fn is_document_file(path: &Path) -> bool {
    path.is_file()
        && path.extension().and_then(|ext| ext.to_str()) == Some(DOCUMENT_EXTENSION)
        && path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(DocumentId::is_canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn connect(temp: &TempDir) -> FileStore {
        FileStore::connect(&StoreConfig::new(temp.path().join("data"))).expect("connect")
    }

    #[test]
    fn connect_creates_missing_data_dir() {
        let temp = TempDir::new().unwrap();
        let store = connect(&temp);
        assert!(store.root_directory().is_dir());
        assert!(store.root_directory().ends_with("data"));
    }

    #[test]
    fn connect_rejects_file_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("file.txt");
        fs::write(&path, "not a directory").unwrap();

        let result = FileStore::connect(&StoreConfig::new(&path));
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }

    #[test]
    fn inserted_document_is_retrievable_and_equal() {
        let temp = TempDir::new().unwrap();
        let store = connect(&temp);
        let document = json!({
            "resourceType": "Patient",
            "identifier": [{"value": "123456"}],
            "birthDate": "1970-01-01"
        });

        let id = store
            .insert_document("encounters", "patients", &document)
            .expect("insert");

        let found = store
            .find_document("encounters", "patients", &id)
            .expect("find");
        assert_eq!(found, Some(document));
    }

    #[test]
    fn documents_land_in_sharded_layout() {
        let temp = TempDir::new().unwrap();
        let store = connect(&temp);

        let id = store
            .insert_document("encounters", "observations", &json!({"a": 1}))
            .unwrap();

        let expected = id.sharded_file(
            &store
                .root_directory()
                .join("encounters")
                .join("observations"),
        );
        assert!(expected.is_file());
        assert!(!expected.with_extension(TEMP_EXTENSION).exists());
    }

    #[test]
    fn find_missing_document_returns_none() {
        let temp = TempDir::new().unwrap();
        let store = connect(&temp);
        let found = store
            .find_document("encounters", "patients", &DocumentId::new())
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn find_reports_corrupt_document() {
        let temp = TempDir::new().unwrap();
        let store = connect(&temp);
        let id = store
            .insert_document("encounters", "patients", &json!({}))
            .unwrap();
        let path = id.sharded_file(&store.collection_dir("encounters", "patients"));
        fs::write(&path, "{ not json").unwrap();

        let result = store.find_document("encounters", "patients", &id);
        assert!(matches!(result, Err(StoreError::Read(_))));
    }

    #[test]
    fn count_is_per_collection() {
        let temp = TempDir::new().unwrap();
        let store = connect(&temp);
        assert_eq!(store.count_documents("encounters", "patients").unwrap(), 0);

        for n in 0..3 {
            store
                .insert_document("encounters", "patients", &json!({ "n": n }))
                .unwrap();
        }
        store
            .insert_document("encounters", "observations", &json!({}))
            .unwrap();

        assert_eq!(store.count_documents("encounters", "patients").unwrap(), 3);
        assert_eq!(
            store.count_documents("encounters", "observations").unwrap(),
            1
        );
        assert_eq!(store.count_documents("other", "patients").unwrap(), 0);
    }

    #[test]
    fn listing_errors_are_reported() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        assert!(matches!(list_entries(&file), Err(StoreError::Read(_))));
        assert!(matches!(
            list_entries(&temp.path().join("missing")),
            Err(StoreError::Read(_))
        ));
    }

    #[test]
    fn count_ignores_stray_files_between_shards() {
        let temp = TempDir::new().unwrap();
        let store = connect(&temp);
        let id = store
            .insert_document("encounters", "patients", &json!({}))
            .unwrap();
        let collection = store.collection_dir("encounters", "patients");
        fs::write(collection.join("README"), "stray").unwrap();
        let shard = id.sharded_file(&collection);
        let shard_dir = shard.parent().unwrap();
        fs::write(shard_dir.join("notes.txt"), "stray").unwrap();
        fs::write(shard_dir.join("not-an-id.json"), "{}").unwrap();

        assert_eq!(store.count_documents("encounters", "patients").unwrap(), 1);
    }

    #[test]
    fn insert_fails_when_collection_path_is_blocked() {
        let temp = TempDir::new().unwrap();
        let store = connect(&temp);
        fs::create_dir_all(store.root_directory().join("encounters")).unwrap();
        fs::write(
            store.root_directory().join("encounters").join("patients"),
            "blocking file",
        )
        .unwrap();

        let result = store.insert_document("encounters", "patients", &json!({}));
        assert!(matches!(result, Err(StoreError::Write(_))));
    }
}
