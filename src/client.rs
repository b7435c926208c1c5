// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Game Data Client
//!
//! Typed async client for the HTTP entry points, used by game backends and
//! tooling. Each method maps to one endpoint:
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | [`GameDataClient::verify`] | `GET /verifyToken` |
//! | [`GameDataClient::get`] | `POST /get` |
//! | [`GameDataClient::set`] | `POST /set` |
//! | [`GameDataClient::update`] | `POST /update` |
//! | [`GameDataClient::delete`] | `POST /remove` |
//!
//! The client must use the same payload mode as the server: attach the
//! shared key with [`GameDataClient::with_cipher`] when the server runs with
//! encryption enabled, and leave it off otherwise.

use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::auth::TokenClaims;
use crate::crypto::{CipherError, PayloadCipher};
use crate::models::{KeyRequest, KeyValueRequest, SuccessResponse, ValueResponse, VerifyTokenResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("payload encryption failed: {0}")]
    Cipher(#[from] CipherError),

    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of a server-side rejection, if that is what this is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct GameDataClient {
    base_url: String,
    token: String,
    cipher: Option<PayloadCipher>,
    http: Client,
}

impl std::fmt::Debug for GameDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameDataClient")
            .field("base_url", &self.base_url)
            .field("encrypted", &self.cipher.is_some())
            .finish_non_exhaustive()
    }
}

impl GameDataClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            cipher: None,
            http,
        })
    }

    /// Encrypt request bodies and decrypt responses with `cipher`.
    pub fn with_cipher(mut self, cipher: PayloadCipher) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Check the token and return its claims.
    pub async fn verify(&self) -> Result<TokenClaims, ClientError> {
        let response = self
            .http
            .get(self.url("/verifyToken"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: VerifyTokenResponse = response.json().await?;
        Ok(body.data)
    }

    /// Read a value. `None` when the key (or the whole game record) is absent.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, ClientError> {
        let body: ValueResponse = self
            .call("/get", &KeyRequest { key: key.to_string() })
            .await?;
        Ok(match body.value {
            Value::Null => None,
            value => Some(value),
        })
    }

    pub async fn set(&self, key: &str, value: Value) -> Result<(), ClientError> {
        let request = KeyValueRequest {
            key: key.to_string(),
            value,
        };
        let _: SuccessResponse = self.call("/set", &request).await?;
        Ok(())
    }

    /// Like [`set`](Self::set) but rejected when the game has no record yet.
    pub async fn update(&self, key: &str, value: Value) -> Result<(), ClientError> {
        let request = KeyValueRequest {
            key: key.to_string(),
            value,
        };
        let _: SuccessResponse = self.call("/update", &request).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), ClientError> {
        let _: SuccessResponse = self
            .call("/remove", &KeyRequest { key: key.to_string() })
            .await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).bearer_auth(&self.token);
        let request = match &self.cipher {
            Some(cipher) => request
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(cipher.seal_json(body)?),
            None => request.json(body),
        };

        let response = check_status(request.send().await?).await?;
        match &self.cipher {
            Some(cipher) => {
                let blob = response.text().await?;
                Ok(cipher.open_json(blob.trim())?)
            }
            None => Ok(response.json().await?),
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Status { status, message })
}
