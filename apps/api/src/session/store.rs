//! In-memory session store. Sessions live until the process exits.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Watchlist entries every new session starts with.
pub const DEFAULT_WATCHLIST: [&str; 2] = ["低空经济", "人形机器人"];

pub const DEFAULT_RISK_PREFERENCE: &str = "稳健";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub current_industry: String,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default = "default_risk_preference")]
    pub risk_preference: String,
}

fn default_risk_preference() -> String {
    DEFAULT_RISK_PREFERENCE.to_string()
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            identity: String::new(),
            current_industry: String::new(),
            experience_years: 0,
            risk_preference: default_risk_preference(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchItem {
    pub industry: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub profile: UserProfile,
    /// Industry handed off from another screen. Consumed into the watchlist
    /// the next time the watchlist is read.
    pub target_industry: Option<String>,
    pub watchlist: Vec<WatchItem>,
}

impl SessionState {
    pub fn new(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            profile: UserProfile::default(),
            target_industry: None,
            watchlist: DEFAULT_WATCHLIST
                .iter()
                .map(|name| WatchItem {
                    industry: name.to_string(),
                    added_at: now,
                })
                .collect(),
        }
    }

    /// Idempotent by name. Returns whether the entry was added.
    pub fn watch(&mut self, industry: &str, now: DateTime<Utc>) -> bool {
        let industry = industry.trim();
        if industry.is_empty() || self.watchlist.iter().any(|w| w.industry == industry) {
            return false;
        }
        self.watchlist.push(WatchItem {
            industry: industry.to_string(),
            added_at: now,
        });
        true
    }

    /// Returns whether an entry was removed.
    pub fn unwatch(&mut self, industry: &str) -> bool {
        let before = self.watchlist.len();
        self.watchlist.retain(|w| w.industry != industry.trim());
        self.watchlist.len() != before
    }

    /// Moves a pending target handoff into the watchlist and clears it.
    pub fn absorb_target(&mut self, now: DateTime<Utc>) {
        if let Some(target) = self.target_industry.take() {
            self.watch(&target, now);
        }
    }
}

/// Handle to all live sessions; cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> SessionState {
        let session = SessionState::new(Uuid::new_v4(), Utc::now());
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(session.id, session.clone());
        debug!("Created session {}", session.id);
        session
    }

    pub fn get(&self, id: Uuid) -> Option<SessionState> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    /// Applies `f` to the session under the write lock. `None` if the
    /// session does not exist.
    pub fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut SessionState) -> T) -> Option<T> {
        let mut sessions = self.inner.write().unwrap_or_else(|e| e.into_inner());
        sessions.get_mut(&id).map(f)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
