// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use game_data_server::{
    api::router,
    config::ServerConfig,
    state::AppState,
    storage::{DocumentStore, DATABASE_FILE},
    telemetry::init_tracing,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    init_tracing(config.log_format).expect("Failed to initialise tracing");

    let db_path = config.data_dir.join(DATABASE_FILE);
    let store = Arc::new(DocumentStore::open(&db_path).expect("Failed to open document store"));

    let mut state = AppState::new(Arc::clone(&store), &config.jwt_secret, &config.admin_secret);
    if let Some(cipher) = config.cipher.clone() {
        state = state.with_cipher(cipher);
    }
    tracing::info!(
        encryption = config.encryption_mode().as_str(),
        database = %db_path.display(),
        "Payload encryption mode"
    );

    let app = router(state);

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(addr = %config.bind_addr, "Game data server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .expect("HTTP server failed");

    tracing::info!("Server drained, closing store");
    match Arc::try_unwrap(store) {
        Ok(store) => store.close(),
        Err(_) => tracing::warn!("Store still referenced at shutdown; dropping handle"),
    }
}

/// Cancel `shutdown` on SIGINT or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
    shutdown.cancel();
}
