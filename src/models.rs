// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive
//! `Serialize`, `Deserialize` and `ToSchema` for JSON handling and the
//! OpenAPI document. Field names are camelCase on the wire, matching the
//! client SDKs.
//!
//! ## Field Values
//!
//! Stored values are arbitrary JSON, modelled as [`serde_json::Value`]
//! (null, bool, number, string, array or object). No schema is enforced.
//!
//! ## Model Categories
//!
//! - **Tokens**: issuance, verification, revocation and listing
//! - **Data**: get/set/update/remove payloads
//! - **Games**: registry administration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::auth::TokenClaims;

// =============================================================================
// Token Models
// =============================================================================

/// Request to issue a developer token.
///
/// Both fields are optional at the JSON level so that missing identifiers
/// produce a 400 rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenRequest {
    #[serde(default)]
    pub game_uid: Option<String>,
    #[serde(default)]
    pub developer_uid: Option<String>,
}

/// A newly issued developer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenResponse {
    pub token: String,
    pub token_id: String,
}

/// Result of a successful token verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub data: TokenClaims,
}

/// Request to revoke a developer token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevokeTokenRequest {
    #[serde(default)]
    pub developer_uid: Option<String>,
    #[serde(default)]
    pub token_id: Option<String>,
}

/// Token metadata as shown to operators. Never includes the token itself.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub token_id: String,
    pub game_uid: String,
    pub game_name: String,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

// =============================================================================
// Data Models
// =============================================================================

/// Payload of `/get` and `/remove`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct KeyRequest {
    pub key: String,
}

/// Payload of `/set` and `/update`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct KeyValueRequest {
    pub key: String,
    /// Any JSON value.
    #[schema(value_type = Object)]
    pub value: Value,
}

/// Response of `/get`. `value` is null when the key or the game is absent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ValueResponse {
    #[schema(value_type = Object)]
    pub value: Value,
}

/// Response of mutating endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// =============================================================================
// Game Registry Models
// =============================================================================

/// Request to register (or rename) a game.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterGameRequest {
    #[serde(default)]
    pub game_uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
