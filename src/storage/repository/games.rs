// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Game registry.
//!
//! Token issuance only succeeds for games registered here.

use serde::{Deserialize, Serialize};

use super::super::{Collection, Document, DocumentStore, StoreResult};

/// Name used when a registry entry carries no usable name.
pub const UNKNOWN_GAME_NAME: &str = "Unknown";

/// Game registry entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntry {
    #[serde(default)]
    pub name: Option<String>,
}

impl GameEntry {
    /// Display name, falling back to `"Unknown"`.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_GAME_NAME,
        }
    }
}

/// Repository for the game registry.
pub struct GameRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> GameRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Look up a game. Unknown fields in the stored document are ignored.
    pub fn get(&self, game_uid: &str) -> StoreResult<Option<GameEntry>> {
        match self.store.get_doc(Collection::Games, game_uid)? {
            Some(doc) => Ok(Some(serde_json::from_value(serde_json::Value::Object(doc))?)),
            None => Ok(None),
        }
    }

    /// Register a game or rename an existing one.
    pub fn register(&self, game_uid: &str, name: &str) -> StoreResult<()> {
        super::super::validate_id(game_uid)?;
        let mut doc = Document::new();
        doc.insert("name".to_string(), serde_json::Value::from(name));
        self.store.set_doc(Collection::Games, game_uid, doc, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreError;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_store() -> (DocumentStore, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = DocumentStore::open(&dir.path().join("data.redb")).expect("open store");
        (store, dir)
    }

    #[test]
    fn register_and_get() {
        let (store, _dir) = test_store();
        let repo = GameRepository::new(&store);

        assert!(repo.get("g1").unwrap().is_none());
        repo.register("g1", "Space Baguette").unwrap();

        let game = repo.get("g1").unwrap().unwrap();
        assert_eq!(game.display_name(), "Space Baguette");
    }

    #[test]
    fn missing_name_falls_back_to_unknown() {
        let (store, _dir) = test_store();
        let mut doc = Document::new();
        doc.insert("owner".to_string(), json!("someone"));
        store.set_doc(Collection::Games, "g2", doc, false).unwrap();

        let game = GameRepository::new(&store).get("g2").unwrap().unwrap();
        assert_eq!(game.display_name(), UNKNOWN_GAME_NAME);
    }

    #[test]
    fn register_rejects_path_like_ids() {
        let (store, _dir) = test_store();
        let err = GameRepository::new(&store).register("a/b", "x").unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }
}
