// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Game Data Server - Authenticated Key-Value Storage for Games
//!
//! This crate stores arbitrary JSON values per game behind developer tokens
//! (HS256 JWTs checked against a revocation record), with an optional
//! AES-256-CBC envelope around request and response bodies.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Developer tokens, admin secret and extractors
//! - `client` - Async SDK for the HTTP API
//! - `crypto` - Payload cipher envelope
//! - `storage` - Embedded document store (redb)

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;
