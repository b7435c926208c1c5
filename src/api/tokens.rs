// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Developer token endpoints.
//!
//! Issuance, revocation and listing require the `x-admin-secret` header.
//! Verification requires the token itself.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::{
    auth::{AdminOnly, Auth, AuthError, IssueError},
    error::ApiError,
    models::{
        GenerateTokenRequest, GenerateTokenResponse, RevokeTokenRequest, SuccessResponse,
        TokenSummary, VerifyTokenResponse,
    },
    state::AppState,
    storage::StoreError,
};

/// Issue a developer token bound to a registered game.
#[utoipa::path(
    post,
    path = "/generateDeveloperToken",
    tag = "Tokens",
    request_body = GenerateTokenRequest,
    params(("x-admin-secret" = String, Header, description = "Admin secret")),
    responses(
        (status = 200, description = "Token issued", body = GenerateTokenResponse),
        (status = 400, description = "Missing gameUid or developerUid"),
        (status = 403, description = "Admin secret mismatch"),
        (status = 404, description = "Game not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn generate_developer_token(
    _admin: AdminOnly,
    State(state): State<AppState>,
    body: Result<Json<GenerateTokenRequest>, JsonRejection>,
) -> Result<Json<GenerateTokenResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Unreadable token request body");
        ApiError::bad_request("Missing gameUid or developerUid")
    })?;

    let game_uid = request.game_uid.unwrap_or_default();
    let developer_uid = request.developer_uid.unwrap_or_default();

    let issued = state
        .tokens
        .issue(&game_uid, &developer_uid)
        .map_err(|e| match e {
            IssueError::MissingIdentifiers => ApiError::bad_request(e.to_string()),
            IssueError::GameNotFound(_) => ApiError::not_found("Game not found"),
            IssueError::Signing(_) | IssueError::Store(_) => {
                tracing::error!(error = %e, "Error generating token");
                ApiError::internal("Internal Server Error")
            }
        })?;

    Ok(Json(GenerateTokenResponse {
        token: issued.token,
        token_id: issued.token_id,
    }))
}

/// Check a bearer token and return its claims.
#[utoipa::path(
    get,
    path = "/verifyToken",
    tag = "Tokens",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token is valid", body = VerifyTokenResponse),
        (status = 401, description = "Missing, invalid or revoked token")
    )
)]
pub async fn verify_token(
    auth: Result<Auth, AuthError>,
) -> Result<Json<VerifyTokenResponse>, AuthError> {
    match auth {
        Ok(Auth(claims)) => Ok(Json(VerifyTokenResponse {
            valid: true,
            data: claims,
        })),
        Err(e) => {
            tracing::warn!(error = %e, error_code = e.error_code(), "Token verification failed");
            Err(e)
        }
    }
}

/// Revoke a developer token.
#[utoipa::path(
    post,
    path = "/revokeDeveloperToken",
    tag = "Tokens",
    request_body = RevokeTokenRequest,
    params(("x-admin-secret" = String, Header, description = "Admin secret")),
    responses(
        (status = 200, description = "Token revoked", body = SuccessResponse),
        (status = 400, description = "Missing developerUid or tokenId"),
        (status = 403, description = "Admin secret mismatch"),
        (status = 404, description = "Token not found")
    )
)]
pub async fn revoke_developer_token(
    _admin: AdminOnly,
    State(state): State<AppState>,
    body: Result<Json<RevokeTokenRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let missing = || ApiError::bad_request("Missing developerUid or tokenId");
    let Json(request) = body.map_err(|_| missing())?;

    let developer_uid = request.developer_uid.unwrap_or_default();
    let token_id = request.token_id.unwrap_or_default();
    if developer_uid.trim().is_empty() || token_id.trim().is_empty() {
        return Err(missing());
    }

    state
        .tokens
        .revoke(developer_uid.trim(), token_id.trim())
        .map_err(|e| match e {
            StoreError::NotFoundRemote(_) | StoreError::InvalidId(_) => {
                ApiError::not_found("Token not found")
            }
            other => {
                tracing::error!(error = %other, "Error revoking token");
                ApiError::internal("Internal Server Error")
            }
        })?;

    Ok(Json(SuccessResponse::ok()))
}

/// List a developer's tokens (without the token strings).
#[utoipa::path(
    get,
    path = "/developerTokens/{developer_uid}",
    tag = "Tokens",
    params(
        ("developer_uid" = String, Path, description = "Developer identifier"),
        ("x-admin-secret" = String, Header, description = "Admin secret")
    ),
    responses(
        (status = 200, description = "Tokens, newest first", body = [TokenSummary]),
        (status = 400, description = "Invalid developer identifier"),
        (status = 403, description = "Admin secret mismatch")
    )
)]
pub async fn list_developer_tokens(
    _admin: AdminOnly,
    State(state): State<AppState>,
    Path(developer_uid): Path<String>,
) -> Result<Json<Vec<TokenSummary>>, ApiError> {
    let records = state.tokens.list(&developer_uid).map_err(|e| match e {
        StoreError::InvalidId(_) => ApiError::bad_request("Invalid developerUid"),
        other => {
            tracing::error!(error = %other, "Error listing tokens");
            ApiError::internal("Internal Server Error")
        }
    })?;

    let summaries = records
        .into_iter()
        .map(|(token_id, record)| TokenSummary {
            token_id,
            game_uid: record.game_uid,
            game_name: record.game_name,
            created_at: record.created_at,
            revoked: record.revoked,
        })
        .collect();

    Ok(Json(summaries))
}
