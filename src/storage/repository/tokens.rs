// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Developer token records.
//!
//! One record per issued token, keyed by `developer_uid/token_id`. The auth
//! gate reads the `revoked` flag on every authenticated request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::super::{nested_key, Collection, Document, DocumentStore, StoreError, StoreResult};

/// Persisted token record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperTokenRecord {
    /// The signed token string as issued
    pub token: String,
    /// Game the token is bound to
    pub game_uid: String,
    /// Game name at issuance time
    pub game_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub revoked: bool,
}

/// Repository for developer token records.
pub struct TokenRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> TokenRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Persist a freshly issued token.
    pub fn create(
        &self,
        developer_uid: &str,
        token_id: &str,
        record: &DeveloperTokenRecord,
    ) -> StoreResult<()> {
        let key = nested_key(developer_uid, token_id)?;
        let doc = to_document(record)?;
        self.store
            .set_doc(Collection::DeveloperTokens, &key, doc, false)
    }

    /// Fetch a token record.
    pub fn get(
        &self,
        developer_uid: &str,
        token_id: &str,
    ) -> StoreResult<Option<DeveloperTokenRecord>> {
        let key = nested_key(developer_uid, token_id)?;
        match self.store.get_doc(Collection::DeveloperTokens, &key)? {
            Some(doc) => Ok(Some(serde_json::from_value(Value::Object(doc))?)),
            None => Ok(None),
        }
    }

    /// Mark a token as revoked. Fails with `NotFoundRemote` for unknown tokens.
    pub fn revoke(&self, developer_uid: &str, token_id: &str) -> StoreResult<()> {
        let key = nested_key(developer_uid, token_id)?;
        let mut fields = Document::new();
        fields.insert("revoked".to_string(), Value::Bool(true));
        self.store
            .update_doc(Collection::DeveloperTokens, &key, fields)
    }

    /// All tokens of one developer, newest first.
    pub fn list_by_developer(
        &self,
        developer_uid: &str,
    ) -> StoreResult<Vec<(String, DeveloperTokenRecord)>> {
        super::super::validate_id(developer_uid)?;
        let prefix = format!("{developer_uid}/");

        let mut records = self
            .store
            .scan_prefix(Collection::DeveloperTokens, &prefix)?
            .into_iter()
            .map(|(key, doc)| -> StoreResult<(String, DeveloperTokenRecord)> {
                let token_id = key[prefix.len()..].to_string();
                let record = serde_json::from_value(Value::Object(doc))?;
                Ok((token_id, record))
            })
            .collect::<StoreResult<Vec<_>>>()?;

        records.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(records)
    }
}

fn to_document(record: &DeveloperTokenRecord) -> StoreResult<Document> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject("developer token record".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn test_store() -> (DocumentStore, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = DocumentStore::open(&dir.path().join("data.redb")).expect("open store");
        (store, dir)
    }

    fn record(game_uid: &str) -> DeveloperTokenRecord {
        DeveloperTokenRecord {
            token: "header.claims.sig".to_string(),
            game_uid: game_uid.to_string(),
            game_name: "Space Baguette".to_string(),
            created_at: Utc::now(),
            revoked: false,
        }
    }

    #[test]
    fn create_and_get() {
        let (store, _dir) = test_store();
        let repo = TokenRepository::new(&store);

        let rec = record("g1");
        repo.create("dev-1", "tok-1", &rec).unwrap();

        assert_eq!(repo.get("dev-1", "tok-1").unwrap(), Some(rec));
        assert_eq!(repo.get("dev-1", "tok-2").unwrap(), None);
        assert_eq!(repo.get("dev-2", "tok-1").unwrap(), None);
    }

    #[test]
    fn stored_fields_use_camel_case() {
        let (store, _dir) = test_store();
        TokenRepository::new(&store)
            .create("dev-1", "tok-1", &record("g1"))
            .unwrap();

        let doc = store
            .get_doc(Collection::DeveloperTokens, "dev-1/tok-1")
            .unwrap()
            .unwrap();
        assert!(doc.contains_key("gameUid"));
        assert!(doc.contains_key("gameName"));
        assert!(doc.contains_key("createdAt"));
        assert_eq!(doc["revoked"], Value::Bool(false));
    }

    #[test]
    fn revoke_sets_flag_and_keeps_record() {
        let (store, _dir) = test_store();
        let repo = TokenRepository::new(&store);
        repo.create("dev-1", "tok-1", &record("g1")).unwrap();

        repo.revoke("dev-1", "tok-1").unwrap();
        let rec = repo.get("dev-1", "tok-1").unwrap().unwrap();
        assert!(rec.revoked);
        assert_eq!(rec.game_uid, "g1");

        // revoking twice is fine
        repo.revoke("dev-1", "tok-1").unwrap();
    }

    #[test]
    fn revoke_unknown_token_fails() {
        let (store, _dir) = test_store();
        let err = TokenRepository::new(&store)
            .revoke("dev-1", "missing")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFoundRemote(_)));
    }

    #[test]
    fn list_by_developer_is_newest_first() {
        let (store, _dir) = test_store();
        let repo = TokenRepository::new(&store);

        let mut old = record("g1");
        old.created_at = Utc::now() - Duration::hours(2);
        let new = record("g2");
        repo.create("dev-1", "a-old", &old).unwrap();
        repo.create("dev-1", "b-new", &new).unwrap();
        repo.create("dev-10", "other", &record("g3")).unwrap();

        let listed = repo.list_by_developer("dev-1").unwrap();
        let ids: Vec<&str> = listed.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["b-new", "a-old"]);
    }
}
