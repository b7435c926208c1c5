// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Developer token claims.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by a developer token.
///
/// There is no `exp`: a token stays valid until its record is
/// revoked or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Developer the token was issued to
    pub developer_uid: String,
    /// Game whose document the token grants access to
    pub game_uid: String,
    /// Unique token identifier (UUIDv4), key of the revocation record
    pub token_id: String,
    /// Issued at (Unix seconds)
    #[serde(default)]
    pub iat: i64,
}

impl TokenClaims {
    pub fn new(
        developer_uid: impl Into<String>,
        game_uid: impl Into<String>,
        token_id: impl Into<String>,
    ) -> Self {
        Self {
            developer_uid: developer_uid.into(),
            game_uid: game_uid.into(),
            token_id: token_id.into(),
            iat: chrono::Utc::now().timestamp(),
        }
    }
}
