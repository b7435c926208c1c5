// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AdminSecret, TokenService};
use crate::crypto::PayloadCipher;
use crate::storage::DocumentStore;

/// Shared application state, cloned into every handler.
///
/// Everything here is built once at startup; handlers never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub tokens: Arc<TokenService>,
    pub admin_secret: Arc<AdminSecret>,
    /// Present when payload encryption is enabled.
    pub cipher: Option<Arc<PayloadCipher>>,
}

impl AppState {
    pub fn new(store: Arc<DocumentStore>, jwt_secret: &str, admin_secret: &str) -> Self {
        Self {
            tokens: Arc::new(TokenService::new(jwt_secret, Arc::clone(&store))),
            store,
            admin_secret: Arc::new(AdminSecret::new(admin_secret)),
            cipher: None,
        }
    }

    /// Enable payload encryption for CRUD bodies.
    pub fn with_cipher(mut self, cipher: PayloadCipher) -> Self {
        self.cipher = Some(Arc::new(cipher));
        self
    }

    pub fn encryption_enabled(&self) -> bool {
        self.cipher.is_some()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::storage::GameRepository;
    use tempfile::TempDir;

    /// Application state over a throwaway database with one registered game.
    pub struct TestApp {
        pub state: AppState,
        _dir: TempDir,
    }

    impl TestApp {
        pub const GAME_UID: &'static str = "game-1";
        pub const GAME_NAME: &'static str = "Space Baguette";
        pub const JWT_SECRET: &'static str = "test-jwt-secret";
        pub const ADMIN_SECRET: &'static str = "test-admin-secret";
        pub const PASSPHRASE: &'static str = "0123456789abcdef0123456789abcdef";

        /// State with payload encryption enabled.
        pub fn new() -> Self {
            let app = Self::plaintext();
            let cipher = PayloadCipher::from_passphrase(Self::PASSPHRASE).unwrap();
            Self {
                state: app.state.with_cipher(cipher),
                _dir: app._dir,
            }
        }

        /// State with payload encryption disabled.
        pub fn plaintext() -> Self {
            let dir = TempDir::new().expect("Failed to create temp dir");
            let store = Arc::new(DocumentStore::open(&dir.path().join("data.redb")).unwrap());
            GameRepository::new(&store)
                .register(Self::GAME_UID, Self::GAME_NAME)
                .unwrap();
            Self {
                state: AppState::new(store, Self::JWT_SECRET, Self::ADMIN_SECRET),
                _dir: dir,
            }
        }

        pub fn cipher(&self) -> PayloadCipher {
            PayloadCipher::from_passphrase(Self::PASSPHRASE).unwrap()
        }

        pub fn issue_token(&self, developer_uid: &str) -> String {
            self.state
                .tokens
                .issue(Self::GAME_UID, developer_uid)
                .unwrap()
                .token
        }
    }
}
