// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository borrows the [`DocumentStore`](super::DocumentStore) and
//! owns the document shape of one collection.

pub mod game_data;
pub mod games;
pub mod tokens;

pub use game_data::GameDataRepository;
pub use games::{GameEntry, GameRepository, UNKNOWN_GAME_NAME};
pub use tokens::{DeveloperTokenRecord, TokenRepository};
