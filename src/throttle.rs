//! Failed-login lockout, kept in process memory.
//!
//! Entries are keyed by normalized email. Checking and recording are two
//! separate steps around the credential check, so concurrent attempts for the
//! same identifier can interleave. Stale identifiers that never retry are not
//! evicted.

use std::sync::Arc;

use dashmap::DashMap;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::config::ThrottleConfig;

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleEntry {
    pub fail_count: u32,
    pub last_failure: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure,
}

pub struct LoginThrottle {
    entries: DashMap<String, ThrottleEntry>,
    max_attempts: u32,
    lockout: Duration,
    clock: Arc<dyn Clock>,
}

impl LoginThrottle {
    pub fn new(config: &ThrottleConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            max_attempts: config.max_attempts,
            lockout: Duration::minutes(config.lockout_minutes),
            clock,
        }
    }

    /// Decides whether a login attempt may reach the credential check.
    /// An entry whose window has elapsed is dropped here.
    pub fn check(&self, identifier: &str) -> Decision {
        let Some(entry) = self.entries.get(identifier).map(|e| *e.value()) else {
            return Decision::Allow;
        };
        let elapsed = self.clock.now() - entry.last_failure;

        if elapsed < self.lockout && entry.fail_count >= self.max_attempts {
            warn!(identifier = %identifier, fail_count = entry.fail_count, "login locked out");
            return Decision::Deny;
        }
        if elapsed >= self.lockout {
            debug!(identifier = %identifier, "lockout window elapsed; resetting");
            self.entries.remove(identifier);
        }
        Decision::Allow
    }

    /// Records the result of a credential check.
    pub fn record(&self, identifier: &str, outcome: AttemptOutcome) {
        match outcome {
            AttemptOutcome::Success => {
                self.entries.remove(identifier);
            }
            AttemptOutcome::Failure => {
                let now = self.clock.now();
                self.entries
                    .entry(identifier.to_string())
                    .and_modify(|e| {
                        e.fail_count += 1;
                        e.last_failure = now;
                    })
                    .or_insert(ThrottleEntry {
                        fail_count: 1,
                        last_failure: now,
                    });
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn entry(&self, identifier: &str) -> Option<ThrottleEntry> {
        self.entries.get(identifier).map(|e| *e.value())
    }
}
