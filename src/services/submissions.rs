// src/services/submissions.rs
// DOCUMENTATION: In-memory ledger of server action submissions
// PURPOSE: At-most-once execution per submission token, with TTL cleanup

use crate::models::{ActionResult, SubmissionStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
enum EntryState {
    Pending,
    Completed(ActionResult),
}

/// Ledger entry; only completed entries expire
#[derive(Clone, Debug)]
struct LedgerEntry {
    state: EntryState,
    expires_at: Instant,
}

impl LedgerEntry {
    fn pending() -> Self {
        Self {
            state: EntryState::Pending,
            expires_at: Instant::now(),
        }
    }

    fn completed(result: ActionResult, ttl: Duration) -> Self {
        Self {
            state: EntryState::Completed(result),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        match self.state {
            // a running action holds its token however long it takes
            EntryState::Pending => false,
            EntryState::Completed(_) => Instant::now() > self.expires_at,
        }
    }
}

/// Tokens are scoped to the action they were submitted to
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SubmissionKey {
    action: String,
    token: String,
}

impl SubmissionKey {
    fn new(action: &str, token: &str) -> Self {
        Self {
            action: action.to_string(),
            token: token.to_string(),
        }
    }
}

/// What `begin` found for a token
#[derive(Debug, Clone, PartialEq)]
pub enum Begin {
    /// Token claimed; the caller runs the action
    Fresh,
    /// Another call with this token has not finished yet
    Pending,
    /// Already done; replay this result
    Completed(ActionResult),
}

/// Thread-safe submission ledger
/// DOCUMENTATION: The only shared mutable state of the server.
/// Expired tokens behave as if never seen
pub struct SubmissionLedger {
    store: Arc<RwLock<HashMap<SubmissionKey, LedgerEntry>>>,
    ttl: Duration,
}

impl SubmissionLedger {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Claim a token for `action`, or report what an earlier claim left behind
    pub async fn begin(&self, action: &str, token: &str) -> Begin {
        let key = SubmissionKey::new(action, token);
        let mut store = self.store.write().await;

        if let Some(entry) = store.get(&key) {
            if !entry.is_expired() {
                return match &entry.state {
                    EntryState::Pending => {
                        log::debug!("Submission {}/{} still pending", action, token);
                        Begin::Pending
                    }
                    EntryState::Completed(result) => {
                        log::debug!("Submission {}/{} replayed", action, token);
                        Begin::Completed(result.clone())
                    }
                };
            }
        }

        store.insert(key, LedgerEntry::pending());
        Begin::Fresh
    }

    /// Store the final result of a claimed token
    pub async fn complete(&self, action: &str, token: &str, result: ActionResult) {
        let mut store = self.store.write().await;
        store.insert(
            SubmissionKey::new(action, token),
            LedgerEntry::completed(result, self.ttl),
        );
        log::debug!(
            "Submission {}/{} completed (TTL: {}s)",
            action,
            token,
            self.ttl.as_secs()
        );
    }

    /// Release a claim whose action never finished
    pub async fn abandon(&self, action: &str, token: &str) {
        let key = SubmissionKey::new(action, token);
        let mut store = self.store.write().await;
        if matches!(store.get(&key).map(|e| &e.state), Some(EntryState::Pending)) {
            store.remove(&key);
            log::warn!("Submission {}/{} abandoned", action, token);
        }
    }

    /// Current state of a token, None when unknown or expired
    pub async fn status(&self, action: &str, token: &str) -> Option<SubmissionStatus> {
        let store = self.store.read().await;
        let entry = store
            .get(&SubmissionKey::new(action, token))
            .filter(|e| !e.is_expired())?;

        Some(match &entry.state {
            EntryState::Pending => SubmissionStatus::Pending {
                submission: token.to_string(),
            },
            EntryState::Completed(result) => SubmissionStatus::Completed {
                submission: token.to_string(),
                result: result.clone(),
            },
        })
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Submission cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    pub async fn stats(&self) -> LedgerStats {
        let store = self.store.read().await;
        let live: Vec<&LedgerEntry> = store.values().filter(|e| !e.is_expired()).collect();
        let pending = live
            .iter()
            .filter(|e| matches!(e.state, EntryState::Pending))
            .count();

        LedgerStats {
            total_entries: store.len(),
            pending_entries: pending,
            completed_entries: live.len() - pending,
        }
    }
}

/// Ledger statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_entries: usize,
    pub pending_entries: usize,
    pub completed_entries: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired submissions
pub fn start_cleanup_task(ledger: Arc<SubmissionLedger>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            ledger.cleanup().await;
        }
    });
}
