//! Server-side stores for the redirect round-trip.
//!
//! The `state` parameter threaded through the consent redirect carries only a
//! random correlation token; the pending event payload waits here until the
//! callback resolves it. Entries are single-use and expire after a bounded
//! window, so a stale or replayed callback finds nothing.
//!
//! Refresh tokens obtained through the token-surfacing callback are likewise
//! kept server-side, keyed by an opaque grant id — the raw token never enters
//! a redirect URL.

use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use crate::models::LeaveEvent;

const PENDING_TTL: Duration = Duration::from_secs(10 * 60);
const GRANT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Pending event payloads keyed by correlation token.
#[derive(Clone)]
pub struct PendingEvents {
    cache: Cache<String, LeaveEvent>,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .time_to_live(PENDING_TTL)
                .max_capacity(10_000)
                .build(),
        }
    }

    /// Stores a pending event and returns the correlation token to embed as
    /// the `state` parameter.
    pub async fn insert(&self, event: LeaveEvent) -> String {
        let token = new_token();
        self.cache.insert(token.clone(), event).await;
        token
    }

    /// Resolves and consumes a correlation token. Removal is atomic, so of
    /// any number of callbacks replaying the same token exactly one sees the
    /// payload.
    pub async fn take(&self, token: &str) -> Option<LeaveEvent> {
        self.cache.remove(token).await
    }
}

impl Default for PendingEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Refresh tokens keyed by opaque grant id.
#[derive(Clone)]
pub struct TokenGrants {
    cache: Cache<String, String>,
}

impl TokenGrants {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .time_to_live(GRANT_TTL)
                .max_capacity(10_000)
                .build(),
        }
    }

    pub async fn insert(&self, refresh_token: String) -> String {
        let grant_id = new_token();
        self.cache.insert(grant_id.clone(), refresh_token).await;
        grant_id
    }

    pub async fn get(&self, grant_id: &str) -> Option<String> {
        self.cache.get(grant_id).await
    }
}

impl Default for TokenGrants {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn event() -> LeaveEvent {
        LeaveEvent {
            summary: "Annual Leave".to_string(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_pending_token_is_single_use() {
        let pending = PendingEvents::new();
        let token = pending.insert(event()).await;

        assert_eq!(pending.take(&token).await, Some(event()));
        assert_eq!(pending.take(&token).await, None);
    }

    #[tokio::test]
    async fn test_concurrent_resolution_yields_exactly_one_payload() {
        let pending = PendingEvents::new();
        let token = pending.insert(event()).await;

        let (a, b) = tokio::join!(pending.take(&token), pending.take(&token));

        assert_eq!(a.is_some() as u8 + b.is_some() as u8, 1);
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_nothing() {
        let pending = PendingEvents::new();
        assert_eq!(pending.take("nope").await, None);
    }

    #[tokio::test]
    async fn test_tokens_are_unique_per_insert() {
        let pending = PendingEvents::new();
        let a = pending.insert(event()).await;
        let b = pending.insert(event()).await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_grant_round_trip() {
        let grants = TokenGrants::new();
        let id = grants.insert("rt-1".to_string()).await;

        assert_eq!(grants.get(&id).await.as_deref(), Some("rt-1"));
        // Grants are reusable until they expire.
        assert_eq!(grants.get(&id).await.as_deref(), Some("rt-1"));
    }
}
