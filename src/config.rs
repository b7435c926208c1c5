// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`ServerConfig`] loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 secret for developer tokens | Required |
//! | `ADMIN_SECRET` | Value expected in the `x-admin-secret` header | Required |
//! | `SECRET_KEY` | 32-byte AES key for payload encryption | Required when encryption is enabled |
//! | `PAYLOAD_ENCRYPTION` | `enabled` or `disabled` | `enabled` |
//! | `DATA_DIR` | Directory holding the database file | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::crypto::{CipherError, PayloadCipher};

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const ADMIN_SECRET_ENV: &str = "ADMIN_SECRET";

/// AES key material. The passphrase bytes are the key, so it must be
/// exactly 32 bytes of UTF-8.
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";

pub const PAYLOAD_ENCRYPTION_ENV: &str = "PAYLOAD_ENCRYPTION";

/// Environment variable name for the data directory path.
///
/// # Default
/// `./data`
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "./data";

pub const HOST_ENV: &str = "HOST";
pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8080;

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("invalid SECRET_KEY: {0}")]
    Cipher(#[from] CipherError),
}

/// How CRUD bodies travel on the wire. One mode per server process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionMode {
    /// Bodies are base64 AES-CBC blobs
    Enabled,
    /// Bodies are plain JSON
    Disabled,
}

impl EncryptionMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "enabled" | "true" | "on" | "1" => Some(Self::Enabled),
            "disabled" | "false" | "off" | "0" => Some(Self::Disabled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Server configuration resolved from the environment.
#[derive(Clone)]
pub struct ServerConfig {
    pub jwt_secret: String,
    pub admin_secret: String,
    /// Set exactly when encryption is enabled.
    pub cipher: Option<PayloadCipher>,
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("encryption", &self.encryption_mode())
            .field("data_dir", &self.data_dir)
            .field("bind_addr", &self.bind_addr)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            match lookup(name) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(ConfigError::Missing(name)),
            }
        };

        let jwt_secret = required(JWT_SECRET_ENV)?;
        let admin_secret = required(ADMIN_SECRET_ENV)?;

        let mode = match lookup(PAYLOAD_ENCRYPTION_ENV) {
            Some(value) => EncryptionMode::parse(&value).ok_or_else(|| ConfigError::Invalid {
                name: PAYLOAD_ENCRYPTION_ENV,
                reason: format!("expected 'enabled' or 'disabled', got {value:?}"),
            })?,
            None => EncryptionMode::Enabled,
        };

        let cipher = match mode {
            EncryptionMode::Enabled => {
                Some(PayloadCipher::from_passphrase(&required(SECRET_KEY_ENV)?)?)
            }
            EncryptionMode::Disabled => None,
        };

        let data_dir: PathBuf = lookup(DATA_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
            .into();

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    name: HOST_ENV,
                    reason: e.to_string(),
                })?;

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            jwt_secret,
            admin_secret,
            cipher,
            data_dir,
            bind_addr,
            log_format,
        })
    }

    pub fn encryption_mode(&self) -> EncryptionMode {
        if self.cipher.is_some() {
            EncryptionMode::Enabled
        } else {
            EncryptionMode::Disabled
        }
    }
}
