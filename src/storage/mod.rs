// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage Module
//!
//! Persistent storage for game data, the game registry and issued developer
//! tokens, in a single embedded redb file under `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! game_data/{game_uid}                    # { "<key>": <any JSON>, ... }
//! games/{game_uid}                        # { "name": "..." }
//! developer_tokens/{developer_uid}/{id}   # token record + revoked flag
//! ```
//!
//! ## Semantics
//!
//! - `set_doc(merge)` creates missing documents; `update_doc` does not
//! - `delete_field` never fails on absent documents or fields
//! - No schema validation, no queries beyond key-prefix scans

pub mod document_store;
pub mod repository;

pub use document_store::{
    nested_key, validate_id, Collection, Document, DocumentStore, StoreError, StoreResult,
};
pub use repository::{
    DeveloperTokenRecord, GameDataRepository, GameEntry, GameRepository, TokenRepository,
    UNKNOWN_GAME_NAME,
};

/// File name of the database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "game-data.redb";
