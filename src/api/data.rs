// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Game data endpoints: `/get`, `/set`, `/update`, `/remove`.
//!
//! Every call runs the same pipeline:
//!
//! ```text
//! authenticate → decode body (decrypt when enabled) → store op → encode (encrypt) → respond
//! ```
//!
//! An empty body on an authenticated call is a 400. Any other failure,
//! whatever stage it comes from, is answered with the same
//! `401 {"error":"Unauthorized"}`; the cause only goes to the log.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    auth::{Auth, AuthError, TokenClaims},
    crypto::CipherError,
    error::ApiError,
    models::{KeyRequest, KeyValueRequest, SuccessResponse, ValueResponse},
    state::AppState,
    storage::{GameDataRepository, StoreError},
};

const MISSING_KEY: &str = "Missing key";
const MISSING_DATA: &str = "Missing data";

#[derive(Debug, thiserror::Error)]
enum DataError {
    #[error("{0}")]
    MissingBody(&'static str),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("payload decryption failed: {0}")]
    Cipher(#[from] CipherError),

    #[error("malformed payload: {0}")]
    Payload(String),

    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),
}

/// Read one value of the caller's game.
#[utoipa::path(
    post,
    path = "/get",
    tag = "Data",
    security(("bearer_auth" = [])),
    request_body(content = KeyRequest, description = "JSON, or its base64 ciphertext when encryption is enabled"),
    responses(
        (status = 200, description = "Value (null when absent)", body = ValueResponse),
        (status = 400, description = "Empty body"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_value(
    auth: Result<Auth, AuthError>,
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let result = run(&state, auth, &body, MISSING_KEY, |repo, claims, req: KeyRequest| {
        let key = require_key(&req.key)?;
        let value = repo.get(&claims.game_uid, key)?.unwrap_or_default();
        Ok(ValueResponse { value })
    });
    respond("get", result)
}

/// Merge one value into the caller's game, creating the game record if needed.
#[utoipa::path(
    post,
    path = "/set",
    tag = "Data",
    security(("bearer_auth" = [])),
    request_body(content = KeyValueRequest, description = "JSON, or its base64 ciphertext when encryption is enabled"),
    responses(
        (status = 200, description = "Value stored", body = SuccessResponse),
        (status = 400, description = "Empty body"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_value(
    auth: Result<Auth, AuthError>,
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let result = run(&state, auth, &body, MISSING_DATA, |repo, claims, req: KeyValueRequest| {
        let key = require_key(&req.key)?;
        repo.set(&claims.game_uid, key, req.value)?;
        Ok(SuccessResponse::ok())
    });
    respond("set", result)
}

/// Update one value of an existing game record.
#[utoipa::path(
    post,
    path = "/update",
    tag = "Data",
    security(("bearer_auth" = [])),
    request_body(content = KeyValueRequest, description = "JSON, or its base64 ciphertext when encryption is enabled"),
    responses(
        (status = 200, description = "Value updated", body = SuccessResponse),
        (status = 400, description = "Empty body"),
        (status = 401, description = "Unauthorized, or the game has no record yet")
    )
)]
pub async fn update_value(
    auth: Result<Auth, AuthError>,
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let result = run(&state, auth, &body, MISSING_DATA, |repo, claims, req: KeyValueRequest| {
        let key = require_key(&req.key)?;
        repo.update(&claims.game_uid, key, req.value)?;
        Ok(SuccessResponse::ok())
    });
    respond("update", result)
}

/// Remove one value from the caller's game.
#[utoipa::path(
    post,
    path = "/remove",
    tag = "Data",
    security(("bearer_auth" = [])),
    request_body(content = KeyRequest, description = "JSON, or its base64 ciphertext when encryption is enabled"),
    responses(
        (status = 200, description = "Value removed (or already absent)", body = SuccessResponse),
        (status = 400, description = "Empty body"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn remove_value(
    auth: Result<Auth, AuthError>,
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let result = run(&state, auth, &body, MISSING_KEY, |repo, claims, req: KeyRequest| {
        let key = require_key(&req.key)?;
        repo.delete(&claims.game_uid, key)?;
        Ok(SuccessResponse::ok())
    });
    respond("remove", result)
}

// =============================================================================
// Pipeline
// =============================================================================

fn run<Req, Resp, F>(
    state: &AppState,
    auth: Result<Auth, AuthError>,
    body: &[u8],
    missing: &'static str,
    op: F,
) -> Result<Response, DataError>
where
    Req: DeserializeOwned,
    Resp: Serialize,
    F: FnOnce(&GameDataRepository<'_>, &TokenClaims, Req) -> Result<Resp, DataError>,
{
    let Auth(claims) = auth?;

    let text = std::str::from_utf8(body)
        .map_err(|e| DataError::Payload(e.to_string()))?
        .trim();
    if text.is_empty() {
        return Err(DataError::MissingBody(missing));
    }

    let request: Req = decode_payload(state, text)?;
    let repo = GameDataRepository::new(&state.store);
    let response = op(&repo, &claims, request)?;
    encode_payload(state, &response)
}

/// Decode a request body according to the server's encryption mode.
///
/// Encrypted bodies arrive either as the bare base64 text or as a JSON
/// string literal wrapping it.
fn decode_payload<T: DeserializeOwned>(state: &AppState, text: &str) -> Result<T, DataError> {
    match &state.cipher {
        Some(cipher) => {
            let blob = if text.starts_with('"') {
                serde_json::from_str::<String>(text)
                    .map_err(|e| DataError::Payload(e.to_string()))?
            } else {
                text.to_string()
            };
            Ok(cipher.open_json(&blob)?)
        }
        None => serde_json::from_str(text).map_err(|e| DataError::Payload(e.to_string())),
    }
}

fn encode_payload<T: Serialize>(state: &AppState, body: &T) -> Result<Response, DataError> {
    match &state.cipher {
        Some(cipher) => {
            let blob = cipher.seal_json(body)?;
            Ok((
                StatusCode::OK,
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                blob,
            )
                .into_response())
        }
        None => Ok(Json(body).into_response()),
    }
}

fn require_key(key: &str) -> Result<&str, DataError> {
    if key.is_empty() {
        return Err(DataError::Payload("empty key".to_string()));
    }
    Ok(key)
}

/// Collapse pipeline failures into the uniform client-facing response.
fn respond(operation: &'static str, result: Result<Response, DataError>) -> Response {
    match result {
        Ok(response) => response,
        Err(DataError::MissingBody(message)) => ApiError::bad_request(message).into_response(),
        Err(e) => {
            match &e {
                DataError::Store(_) => {
                    tracing::error!(operation, error = %e, "Data operation failed")
                }
                _ => tracing::warn!(operation, error = %e, "Data request rejected"),
            }
            ApiError::unauthorized().into_response()
        }
    }
}
