// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Developer token issuance, verification and revocation.
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET`. Every issued token has a
//! record in the `developer_tokens` collection; a token authenticates only
//! while that record exists and is not revoked.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{AuthError, TokenClaims};
use crate::storage::{
    DeveloperTokenRecord, DocumentStore, GameRepository, StoreError, TokenRepository,
};

/// Errors from token issuance.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("Missing gameUid or developerUid")]
    MissingIdentifiers,

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: String,
    pub claims: TokenClaims,
}

/// Token service: signs, verifies and tracks developer tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    store: Arc<DocumentStore>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service signing with `secret` and persisting records
    /// in `store`.
    pub fn new(secret: &str, store: Arc<DocumentStore>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no exp; revocation is the only invalidation path
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            store,
        }
    }

    /// Sign a set of claims.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
    }

    /// Verify the signature of a token and decode its claims.
    ///
    /// Does not consult the revocation records; see [`TokenService::authenticate`].
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }

    /// Verify a token and check that its record exists and is not revoked.
    pub fn authenticate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.verify(token)?;

        let record = TokenRepository::new(&self.store)
            .get(&claims.developer_uid, &claims.token_id)
            .map_err(|e| match e {
                // Ids that cannot name a record cannot have one
                StoreError::InvalidId(_) => AuthError::TokenNotFound,
                other => AuthError::InternalError(other.to_string()),
            })?;

        match record {
            None => Err(AuthError::TokenNotFound),
            Some(record) if record.revoked => Err(AuthError::TokenRevoked),
            Some(_) => Ok(claims),
        }
    }

    /// Issue a token for a developer on a registered game.
    ///
    /// The admin secret must have been checked by the caller. Nothing is
    /// persisted when the game does not exist.
    pub fn issue(&self, game_uid: &str, developer_uid: &str) -> Result<IssuedToken, IssueError> {
        let game_uid = game_uid.trim();
        let developer_uid = developer_uid.trim();
        if game_uid.is_empty() || developer_uid.is_empty() {
            return Err(IssueError::MissingIdentifiers);
        }

        let game = match GameRepository::new(&self.store).get(game_uid) {
            Ok(Some(game)) => game,
            Ok(None) | Err(StoreError::InvalidId(_)) => {
                return Err(IssueError::GameNotFound(game_uid.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let token_id = uuid::Uuid::new_v4().to_string();
        let claims = TokenClaims::new(developer_uid, game_uid, token_id.clone());
        let token = self.sign(&claims)?;

        let record = DeveloperTokenRecord {
            token: token.clone(),
            game_uid: game_uid.to_string(),
            game_name: game.display_name().to_string(),
            created_at: Utc::now(),
            revoked: false,
        };
        TokenRepository::new(&self.store).create(developer_uid, &token_id, &record)?;

        tracing::info!(
            developer_uid = %developer_uid,
            game_uid = %game_uid,
            token_id = %token_id,
            "Developer token issued"
        );

        Ok(IssuedToken {
            token,
            token_id,
            claims,
        })
    }

    /// Mark a token revoked. Fails with `StoreError::NotFoundRemote` for
    /// unknown tokens.
    pub fn revoke(&self, developer_uid: &str, token_id: &str) -> Result<(), StoreError> {
        TokenRepository::new(&self.store).revoke(developer_uid, token_id)?;
        tracing::info!(
            developer_uid = %developer_uid,
            token_id = %token_id,
            "Developer token revoked"
        );
        Ok(())
    }

    /// Token records of one developer, newest first.
    pub fn list(&self, developer_uid: &str) -> Result<Vec<(String, DeveloperTokenRecord)>, StoreError> {
        TokenRepository::new(&self.store).list_by_developer(developer_uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Collection, GameRepository};
    use tempfile::TempDir;

    const SECRET: &str = "test-jwt-secret";

    fn service() -> (TokenService, Arc<DocumentStore>, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(DocumentStore::open(&dir.path().join("data.redb")).unwrap());
        GameRepository::new(&store)
            .register("game-1", "Space Baguette")
            .unwrap();
        (TokenService::new(SECRET, Arc::clone(&store)), store, dir)
    }

    #[test]
    fn issue_then_authenticate() {
        let (svc, _store, _dir) = service();
        let issued = svc.issue("game-1", "dev-1").unwrap();

        let claims = svc.authenticate(&issued.token).unwrap();
        assert_eq!(claims.developer_uid, "dev-1");
        assert_eq!(claims.game_uid, "game-1");
        assert_eq!(claims.token_id, issued.token_id);
        assert!(uuid::Uuid::parse_str(&issued.token_id).is_ok());
    }

    #[test]
    fn issue_persists_record_with_game_name() {
        let (svc, store, _dir) = service();
        let issued = svc.issue("game-1", "dev-1").unwrap();

        let record = TokenRepository::new(&store)
            .get("dev-1", &issued.token_id)
            .unwrap()
            .unwrap();
        assert_eq!(record.token, issued.token);
        assert_eq!(record.game_name, "Space Baguette");
        assert!(!record.revoked);
    }

    #[test]
    fn token_ids_are_unique() {
        let (svc, _store, _dir) = service();
        let a = svc.issue("game-1", "dev-1").unwrap();
        let b = svc.issue("game-1", "dev-1").unwrap();
        assert_ne!(a.token_id, b.token_id);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn issue_for_unknown_game_persists_nothing() {
        let (svc, store, _dir) = service();
        let err = svc.issue("no-such-game", "dev-1").unwrap_err();
        assert!(matches!(err, IssueError::GameNotFound(_)));

        let records = store
            .scan_prefix(Collection::DeveloperTokens, "dev-1/")
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn issue_requires_identifiers() {
        let (svc, _store, _dir) = service();
        assert!(matches!(svc.issue("", "dev-1"), Err(IssueError::MissingIdentifiers)));
        assert!(matches!(svc.issue("game-1", "  "), Err(IssueError::MissingIdentifiers)));
    }

    #[test]
    fn revoked_token_is_rejected_even_though_signature_verifies() {
        let (svc, _store, _dir) = service();
        let issued = svc.issue("game-1", "dev-1").unwrap();

        svc.revoke("dev-1", &issued.token_id).unwrap();

        assert!(svc.verify(&issued.token).is_ok());
        assert!(matches!(
            svc.authenticate(&issued.token),
            Err(AuthError::TokenRevoked)
        ));
    }

    #[test]
    fn signed_token_without_record_is_rejected() {
        let (svc, _store, _dir) = service();
        let token = svc
            .sign(&TokenClaims::new("dev-1", "game-1", "never-issued"))
            .unwrap();
        assert!(matches!(svc.authenticate(&token), Err(AuthError::TokenNotFound)));
    }

    #[test]
    fn token_from_other_secret_fails_signature() {
        let (svc, store, _dir) = service();
        let issued = svc.issue("game-1", "dev-1").unwrap();

        let other = TokenService::new("another-secret", store);
        assert!(matches!(
            other.authenticate(&issued.token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let (svc, _store, _dir) = service();
        assert!(matches!(svc.verify("not-a-jwt"), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn list_returns_issued_tokens() {
        let (svc, _store, _dir) = service();
        let a = svc.issue("game-1", "dev-1").unwrap();
        let b = svc.issue("game-1", "dev-1").unwrap();
        svc.issue("game-1", "dev-2").unwrap();

        let mut ids: Vec<String> = svc.list("dev-1").unwrap().into_iter().map(|(id, _)| id).collect();
        ids.sort();
        let mut expected = vec![a.token_id, b.token_id];
        expected.sort();
        assert_eq!(ids, expected);
    }
}
