// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `game_data`: game_uid → JSON object of arbitrary fields
//! - `games`: game_uid → game registry document (`{"name": ...}`)
//! - `developer_tokens`: `developer_uid/token_id` → token record document
//!
//! Every mutation runs inside a single write transaction. redb serializes
//! writers, so each read-modify-write of a document is atomic and concurrent
//! writes to distinct fields of the same document never lose each other.

use std::path::{Path, PathBuf};

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde_json::{Map, Value};

/// A JSON document: a flat mapping of field names to values.
pub type Document = Map<String, Value>;

// =============================================================================
// Table Definitions
// =============================================================================

const GAME_DATA: TableDefinition<&str, &[u8]> = TableDefinition::new("game_data");

const GAMES: TableDefinition<&str, &[u8]> = TableDefinition::new("games");

const DEVELOPER_TOKENS: TableDefinition<&str, &[u8]> = TableDefinition::new("developer_tokens");

/// Logical collections of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Per-game key-value documents.
    GameData,
    /// Game registry.
    Games,
    /// Issued developer tokens, keyed by `developer_uid/token_id`.
    DeveloperTokens,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::GameData => "game_data",
            Collection::Games => "games",
            Collection::DeveloperTokens => "developer_tokens",
        }
    }

    fn table(self) -> TableDefinition<'static, &'static str, &'static [u8]> {
        match self {
            Collection::GameData => GAME_DATA,
            Collection::Games => GAMES,
            Collection::DeveloperTokens => DEVELOPER_TOKENS,
        }
    }

    const ALL: [Collection; 3] = [
        Collection::GameData,
        Collection::Games,
        Collection::DeveloperTokens,
    ];
}

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The targeted document does not exist (update on a missing record).
    #[error("no document to update: {0}")]
    NotFoundRemote(String),

    #[error("invalid document id: {0:?}")]
    InvalidId(String),

    #[error("document {0} is not a JSON object")]
    NotAnObject(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Key Helpers
// =============================================================================

/// Document ids are non-empty and must not contain the path separator.
pub fn validate_id(id: &str) -> StoreResult<()> {
    if id.is_empty() || id.contains('/') {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Build a nested document key (`parent/child`).
pub fn nested_key(parent: &str, child: &str) -> StoreResult<String> {
    validate_id(parent)?;
    validate_id(child)?;
    Ok(format!("{parent}/{child}"))
}

fn decode(collection: Collection, key: &str, bytes: &[u8]) -> StoreResult<Document> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject(format!(
            "{}/{key}",
            collection.name()
        ))),
    }
}

// =============================================================================
// DocumentStore
// =============================================================================

/// Embedded document store.
///
/// Opened once at process start and shared behind an `Arc`; closed by
/// [`DocumentStore::close`] once the server has drained.
pub struct DocumentStore {
    db: Database,
    path: PathBuf,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("path", &self.path)
            .finish()
    }
}

impl DocumentStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            for collection in Collection::ALL {
                let _ = write_txn.open_table(collection.table())?;
            }
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Document store opened");

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the store. Committed data is already durable; this only
    /// releases the file handle.
    pub fn close(self) {
        tracing::info!(path = %self.path.display(), "Document store closed");
        drop(self.db);
    }

    /// Cheap liveness check used by the health endpoint.
    pub fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(GAMES)?;
        Ok(())
    }

    // =========================================================================
    // Document Primitives
    // =========================================================================

    /// Read a whole document.
    pub fn get_doc(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection.table())?;
        match table.get(id)? {
            Some(value) => Ok(Some(decode(collection, id, value.value())?)),
            None => Ok(None),
        }
    }

    /// Write fields into a document.
    ///
    /// With `merge`, only the given fields are replaced and the rest of the
    /// document is kept; without it the document is overwritten. Either way
    /// the document is created if absent.
    pub fn set_doc(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
        merge: bool,
    ) -> StoreResult<()> {
        self.mutate(collection, id, |existing| {
            let mut doc = match existing {
                Some(doc) if merge => doc,
                _ => Document::new(),
            };
            doc.extend(fields);
            Ok(Some(doc))
        })
    }

    /// Update fields of an existing document.
    ///
    /// Fails with [`StoreError::NotFoundRemote`] when the document is absent.
    pub fn update_doc(&self, collection: Collection, id: &str, fields: Document) -> StoreResult<()> {
        self.mutate(collection, id, |existing| match existing {
            Some(mut doc) => {
                doc.extend(fields);
                Ok(Some(doc))
            }
            None => Err(StoreError::NotFoundRemote(format!(
                "{}/{id}",
                collection.name()
            ))),
        })
    }

    /// Remove one field from a document. Missing documents and missing
    /// fields are left untouched.
    pub fn delete_field(&self, collection: Collection, id: &str, field: &str) -> StoreResult<()> {
        self.mutate(collection, id, |existing| {
            Ok(existing.map(|mut doc| {
                doc.remove(field);
                doc
            }))
        })
    }

    /// List documents whose key starts with `prefix`, in key order.
    pub fn scan_prefix(
        &self,
        collection: Collection,
        prefix: &str,
    ) -> StoreResult<Vec<(String, Document)>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection.table())?;

        let mut docs = Vec::new();
        for entry in table.range(prefix..)? {
            let (key, value) = entry?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            docs.push((key.to_string(), decode(collection, key, value.value())?));
        }
        Ok(docs)
    }

    /// Read-modify-write of a single document inside one write transaction.
    ///
    /// The closure receives the current document (if any) and returns the new
    /// one. Returning `Ok(None)` leaves the document absent; returning an error
    /// aborts the transaction.
    fn mutate<F>(&self, collection: Collection, id: &str, f: F) -> StoreResult<()>
    where
        F: FnOnce(Option<Document>) -> StoreResult<Option<Document>>,
    {
        if id.is_empty() {
            return Err(StoreError::InvalidId(id.to_string()));
        }

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(collection.table())?;
            let existing = match table.get(id)? {
                Some(value) => Some(decode(collection, id, value.value())?),
                None => None,
            };

            match f(existing)? {
                Some(doc) => {
                    let bytes = serde_json::to_vec(&doc)?;
                    table.insert(id, bytes.as_slice())?;
                }
                None => {
                    table.remove(id)?;
                }
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_store() -> (DocumentStore, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = DocumentStore::open(&dir.path().join("store.redb")).expect("open store");
        (store, dir)
    }

    fn fields(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn get_missing_document_is_none() {
        let (store, _dir) = test_store();
        assert!(store.get_doc(Collection::GameData, "nope").unwrap().is_none());
    }

    #[test]
    fn merge_set_keeps_other_fields() {
        let (store, _dir) = test_store();
        store
            .set_doc(Collection::GameData, "g1", fields(json!({"a": 1})), true)
            .unwrap();
        store
            .set_doc(Collection::GameData, "g1", fields(json!({"b": 2})), true)
            .unwrap();

        let doc = store.get_doc(Collection::GameData, "g1").unwrap().unwrap();
        assert_eq!(Value::Object(doc), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn non_merge_set_overwrites() {
        let (store, _dir) = test_store();
        store
            .set_doc(Collection::Games, "g1", fields(json!({"a": 1})), false)
            .unwrap();
        store
            .set_doc(Collection::Games, "g1", fields(json!({"b": 2})), false)
            .unwrap();

        let doc = store.get_doc(Collection::Games, "g1").unwrap().unwrap();
        assert_eq!(Value::Object(doc), json!({"b": 2}));
    }

    #[test]
    fn update_requires_existing_document() {
        let (store, _dir) = test_store();
        let err = store
            .update_doc(Collection::GameData, "g1", fields(json!({"a": 1})))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFoundRemote(_)));
        assert!(store.get_doc(Collection::GameData, "g1").unwrap().is_none());
    }

    #[test]
    fn delete_field_on_missing_document_is_noop() {
        let (store, _dir) = test_store();
        store.delete_field(Collection::GameData, "g1", "a").unwrap();
        assert!(store.get_doc(Collection::GameData, "g1").unwrap().is_none());
    }

    #[test]
    fn scan_prefix_stays_within_prefix() {
        let (store, _dir) = test_store();
        for key in ["dev1/t1", "dev1/t2", "dev10/t1", "dev2/t1"] {
            store
                .set_doc(Collection::DeveloperTokens, key, fields(json!({"k": key})), false)
                .unwrap();
        }

        let keys: Vec<String> = store
            .scan_prefix(Collection::DeveloperTokens, "dev1/")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["dev1/t1", "dev1/t2"]);
    }

    #[test]
    fn nested_key_rejects_separator() {
        assert_eq!(nested_key("dev", "tok").unwrap(), "dev/tok");
        assert!(matches!(nested_key("a/b", "tok"), Err(StoreError::InvalidId(_))));
        assert!(matches!(nested_key("dev", ""), Err(StoreError::InvalidId(_))));
    }

    #[test]
    fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.redb");
        {
            let store = DocumentStore::open(&path).unwrap();
            store
                .set_doc(Collection::GameData, "g1", fields(json!({"a": [1, 2]})), true)
                .unwrap();
            store.close();
        }

        let store = DocumentStore::open(&path).unwrap();
        let doc = store.get_doc(Collection::GameData, "g1").unwrap().unwrap();
        assert_eq!(doc["a"], json!([1, 2]));
    }

    #[test]
    fn concurrent_merge_writes_do_not_clobber() {
        let (store, _dir) = test_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let mut doc = Document::new();
                    doc.insert(format!("k{i}"), json!(i));
                    store.set_doc(Collection::GameData, "g1", doc, true).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let doc = store.get_doc(Collection::GameData, "g1").unwrap().unwrap();
        assert_eq!(doc.len(), 16);
        for i in 0..16 {
            assert_eq!(doc[&format!("k{i}")], json!(i));
        }
    }
}
