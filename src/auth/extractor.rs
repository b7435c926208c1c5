// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for developer tokens and the admin secret.
//!
//! Use the `Auth` extractor in handlers to require a valid, unrevoked token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims.game_uid scopes every data access
//! }
//! ```
//!
//! Handlers that must hide the failure reason take `Result<Auth, AuthError>`
//! instead and decide on the response themselves.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{admin::ADMIN_SECRET_HEADER, AuthError, TokenClaims};
use crate::state::AppState;

/// Extractor for authenticated developer tokens.
pub struct Auth(pub TokenClaims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = state.tokens.authenticate(token)?;
        Ok(Auth(claims))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedToken);
    }
    Ok(token)
}

/// Extractor that requires the `x-admin-secret` header to match.
pub struct AdminOnly;

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(ADMIN_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::InvalidAdminSecret)?;

        if !state.admin_secret.matches(provided) {
            tracing::warn!("Rejected request with wrong admin secret");
            return Err(AuthError::InvalidAdminSecret);
        }

        Ok(AdminOnly)
    }
}
