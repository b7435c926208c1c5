// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    auth::AdminOnly,
    error::ApiError,
    models::{RegisterGameRequest, SuccessResponse},
    state::AppState,
    storage::{GameRepository, StoreError, UNKNOWN_GAME_NAME},
};

/// Register a game, or rename one that already exists.
///
/// Token issuance only accepts games present in this registry.
#[utoipa::path(
    post,
    path = "/registerGame",
    tag = "Games",
    request_body = RegisterGameRequest,
    params(("x-admin-secret" = String, Header, description = "Admin secret")),
    responses(
        (status = 200, description = "Game registered", body = SuccessResponse),
        (status = 400, description = "Missing or invalid gameUid"),
        (status = 403, description = "Admin secret mismatch"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_game(
    _admin: AdminOnly,
    State(state): State<AppState>,
    body: Result<Json<RegisterGameRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Unreadable game registration body");
        ApiError::bad_request("Missing gameUid")
    })?;

    let game_uid = request.game_uid.unwrap_or_default();
    let game_uid = game_uid.trim();
    if game_uid.is_empty() {
        return Err(ApiError::bad_request("Missing gameUid"));
    }
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_GAME_NAME);

    GameRepository::new(&state.store)
        .register(game_uid, name)
        .map_err(|e| match e {
            StoreError::InvalidId(_) => ApiError::bad_request("Invalid gameUid"),
            other => {
                tracing::error!(error = %other, "Failed to register game");
                ApiError::internal("Internal Server Error")
            }
        })?;

    tracing::info!(game_uid = %game_uid, name = %name, "Game registered");
    Ok(Json(SuccessResponse::ok()))
}
