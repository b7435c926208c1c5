// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::TokenClaims,
    models::{
        GenerateTokenRequest, GenerateTokenResponse, KeyRequest, KeyValueRequest,
        RegisterGameRequest, RevokeTokenRequest, SuccessResponse, TokenSummary, ValueResponse,
        VerifyTokenResponse,
    },
    state::AppState,
};

pub mod data;
pub mod games;
pub mod health;
pub mod tokens;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/generateDeveloperToken", post(tokens::generate_developer_token))
        .route("/verifyToken", get(tokens::verify_token))
        .route("/revokeDeveloperToken", post(tokens::revoke_developer_token))
        .route(
            "/developerTokens/{developer_uid}",
            get(tokens::list_developer_tokens),
        )
        .route("/registerGame", post(games::register_game))
        .route("/get", post(data::get_value))
        .route("/set", post(data::set_value))
        .route("/update", post(data::update_value))
        .route("/remove", post(data::remove_value))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer_auth` scheme referenced by the token-protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        tokens::generate_developer_token,
        tokens::verify_token,
        tokens::revoke_developer_token,
        tokens::list_developer_tokens,
        games::register_game,
        data::get_value,
        data::set_value,
        data::update_value,
        data::remove_value,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            TokenClaims,
            GenerateTokenRequest,
            GenerateTokenResponse,
            VerifyTokenResponse,
            RevokeTokenRequest,
            TokenSummary,
            RegisterGameRequest,
            KeyRequest,
            KeyValueRequest,
            ValueResponse,
            SuccessResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Tokens", description = "Developer token issuance and verification"),
        (name = "Games", description = "Game registry administration"),
        (name = "Data", description = "Per-game key-value storage"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;
