// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Developer tokens for the game data API.
//!
//! ## Auth Flow
//!
//! 1. An operator calls `/generateDeveloperToken` with `x-admin-secret`
//! 2. The server signs `{developerUid, gameUid, tokenId, iat}` (HS256) and
//!    stores a token record with `revoked = false`
//! 3. The SDK sends `Authorization: Bearer <token>` on every call
//! 4. The server:
//!    - verifies the signature
//!    - loads the record for `(developerUid, tokenId)`
//!    - rejects missing or revoked records
//!
//! ## Security
//!
//! - Tokens have no expiry; revocation is the only way to invalidate one
//! - The admin secret is compared through SHA-256 digests

pub mod admin;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod token;

pub use admin::{AdminSecret, ADMIN_SECRET_HEADER};
pub use claims::TokenClaims;
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use token::{IssueError, IssuedToken, TokenService};
