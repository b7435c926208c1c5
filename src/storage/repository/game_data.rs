// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key-value facade over per-game documents.
//!
//! Each game owns one document in the `game_data` collection. Keys are
//! top-level fields of that document and values are arbitrary JSON.

use serde_json::Value;

use super::super::{Collection, Document, DocumentStore, StoreResult};

/// Repository for game key-value operations.
pub struct GameDataRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> GameDataRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Read one field. Absent document or absent field yields `None`.
    pub fn get(&self, game_uid: &str, key: &str) -> StoreResult<Option<Value>> {
        let doc = self.store.get_doc(Collection::GameData, game_uid)?;
        Ok(doc.and_then(|mut doc| doc.remove(key)))
    }

    /// Merge one field into the game document, creating it if absent.
    pub fn set(&self, game_uid: &str, key: &str, value: Value) -> StoreResult<()> {
        self.store
            .set_doc(Collection::GameData, game_uid, single(key, value), true)
    }

    /// Write one field of an existing game document.
    ///
    /// Fails with `StoreError::NotFoundRemote` when the game has no document yet.
    pub fn update(&self, game_uid: &str, key: &str, value: Value) -> StoreResult<()> {
        self.store
            .update_doc(Collection::GameData, game_uid, single(key, value))
    }

    /// Remove one field. No error when the field or the document is absent.
    pub fn delete(&self, game_uid: &str, key: &str) -> StoreResult<()> {
        self.store.delete_field(Collection::GameData, game_uid, key)
    }
}

fn single(key: &str, value: Value) -> Document {
    let mut doc = Document::new();
    doc.insert(key.to_string(), value);
    doc
}
