use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::shared::data::store::MockStore;

/// Refresh token; only the SHA-256 hash of the token is kept
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub id: String,
    pub employee_id: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

pub fn store_refresh_token(
    store: &mut MockStore,
    employee_id: &str,
    token: &str,
    expires_at: DateTime<Utc>,
) {
    let now = Utc::now();
    // expired and revoked tokens are of no further use
    store.refresh_tokens.retain(|t| t.is_live(now));
    store.refresh_tokens.push(RefreshTokenRecord {
        id: uuid::Uuid::new_v4().to_string(),
        employee_id: employee_id.to_string(),
        token_hash: hash_token(token),
        created_at: now,
        expires_at,
        revoked_at: None,
    });
}

/// Employee id for a live refresh token
pub fn validate_refresh_token(store: &MockStore, token: &str) -> Option<String> {
    let token_hash = hash_token(token);
    let now = Utc::now();
    store
        .refresh_tokens
        .iter()
        .find(|t| t.token_hash == token_hash && t.is_live(now))
        .map(|t| t.employee_id.clone())
}

pub fn revoke_refresh_token(store: &mut MockStore, token: &str) -> bool {
    let token_hash = hash_token(token);
    let now = Utc::now();
    match store
        .refresh_tokens
        .iter_mut()
        .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
    {
        Some(record) => {
            record.revoked_at = Some(now);
            true
        }
        None => false,
    }
}

/// Revoke every session of an employee (blocked or deleted)
pub fn revoke_for_employee(store: &mut MockStore, employee_id: &str) {
    let now = Utc::now();
    for record in store
        .refresh_tokens
        .iter_mut()
        .filter(|t| t.employee_id == employee_id && t.revoked_at.is_none())
    {
        record.revoked_at = Some(now);
    }
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_validate_revoke() {
        let mut store = MockStore::default();
        let expires = Utc::now() + chrono::Duration::days(1);
        store_refresh_token(&mut store, "emp-1", "token-a", expires);

        assert_eq!(store.refresh_tokens[0].token_hash.len(), 64);
        assert_ne!(store.refresh_tokens[0].token_hash, "token-a");
        assert_eq!(
            validate_refresh_token(&store, "token-a").as_deref(),
            Some("emp-1")
        );
        assert!(validate_refresh_token(&store, "token-b").is_none());

        assert!(revoke_refresh_token(&mut store, "token-a"));
        assert!(!revoke_refresh_token(&mut store, "token-a"));
        assert!(validate_refresh_token(&store, "token-a").is_none());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let mut store = MockStore::default();
        let expired = Utc::now() - chrono::Duration::seconds(1);
        store_refresh_token(&mut store, "emp-1", "old", expired);
        assert!(validate_refresh_token(&store, "old").is_none());
    }

    #[test]
    fn test_revoke_for_employee() {
        let mut store = MockStore::default();
        let expires = Utc::now() + chrono::Duration::days(1);
        store_refresh_token(&mut store, "emp-1", "t1", expires);
        store_refresh_token(&mut store, "emp-2", "t2", expires);
        revoke_for_employee(&mut store, "emp-1");
        assert!(validate_refresh_token(&store, "t1").is_none());
        assert!(validate_refresh_token(&store, "t2").is_some());
    }
}
