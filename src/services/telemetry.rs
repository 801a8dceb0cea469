//! Cross-session manifestation statistics.
//!
//! The store maps normalized tokens (prop and character names) to attempt and
//! success counters. It is shared by every session in the process: counters
//! are atomics inside a map that only takes its write lock when a token is
//! seen for the first time. Rate lookups read the two counters without a
//! lock and may observe a slightly stale pair, which is fine for the
//! heuristic use in the prompt enhancer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::models::TelemetryRecord;
use crate::utils::sanitize::normalize_token;

#[derive(Debug, Default)]
struct TokenCounters {
    attempts: AtomicU64,
    successes: AtomicU64,
}

impl TokenCounters {
    /// Read successes before attempts; attempts is always bumped first, so the
    /// pair never violates `successes <= attempts`.
    fn load(&self) -> (u64, u64) {
        let successes = self.successes.load(Ordering::Acquire);
        let attempts = self.attempts.load(Ordering::Acquire);
        (attempts, successes.min(attempts))
    }
}

/// Shared token outcome store.
#[derive(Debug, Default)]
pub struct TelemetryStore {
    counters: RwLock<HashMap<String, Arc<TokenCounters>>>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted records.
    ///
    /// Records with `successes > attempts` are clamped; duplicate tokens are summed.
    pub fn from_records(records: impl IntoIterator<Item = TelemetryRecord>) -> Self {
        let store = Self::new();
        for record in records {
            let key = normalize_token(&record.token);
            if key.is_empty() {
                continue;
            }
            let counters = store.counters_for(&key);
            counters
                .attempts
                .fetch_add(record.attempts, Ordering::AcqRel);
            counters
                .successes
                .fetch_add(record.successes.min(record.attempts), Ordering::AcqRel);
        }
        store
    }

    fn counters_for(&self, key: &str) -> Arc<TokenCounters> {
        {
            let map = self.counters.read().unwrap_or_else(|e| e.into_inner());
            if let Some(counters) = map.get(key) {
                return Arc::clone(counters);
            }
        }
        let mut map = self.counters.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(map.entry(key.to_string()).or_default())
    }

    /// Record whether `token` appeared in a generated output.
    ///
    /// Always increments attempts; increments successes only when `appeared`.
    /// Returns the updated record, or `None` for a blank token.
    pub fn record_outcome(&self, token: &str, appeared: bool) -> Option<TelemetryRecord> {
        let key = normalize_token(token);
        if key.is_empty() {
            return None;
        }

        let counters = self.counters_for(&key);
        counters.attempts.fetch_add(1, Ordering::AcqRel);
        if appeared {
            counters.successes.fetch_add(1, Ordering::AcqRel);
        }

        let (attempts, successes) = counters.load();
        debug!(
            "Telemetry '{}': {}/{} (appeared: {})",
            key, successes, attempts, appeared
        );
        Some(TelemetryRecord {
            token: key,
            attempts,
            successes,
        })
    }

    /// Current record for `token`, if it has ever been recorded.
    pub fn record(&self, token: &str) -> Option<TelemetryRecord> {
        let key = normalize_token(token);
        let map = self.counters.read().unwrap_or_else(|e| e.into_inner());
        map.get(&key).map(|c| {
            let (attempts, successes) = c.load();
            TelemetryRecord {
                token: key.clone(),
                attempts,
                successes,
            }
        })
    }

    /// `successes / attempts` for `token`, `None` when there is no history.
    pub fn manifestation_rate(&self, token: &str) -> Option<f64> {
        self.record(token).and_then(|r| r.manifestation_rate())
    }

    /// Manifestation rate, or `prior` for tokens without history.
    pub fn rate_or(&self, token: &str, prior: f64) -> f64 {
        self.manifestation_rate(token).unwrap_or(prior)
    }

    /// All records, sorted by token.
    pub fn snapshot(&self) -> Vec<TelemetryRecord> {
        let map = self.counters.read().unwrap_or_else(|e| e.into_inner());
        let mut records: Vec<TelemetryRecord> = map
            .iter()
            .map(|(token, c)| {
                let (attempts, successes) = c.load();
                TelemetryRecord {
                    token: token.clone(),
                    attempts,
                    successes,
                }
            })
            .collect();
        records.sort_by(|a, b| a.token.cmp(&b.token));
        records
    }

    pub fn len(&self) -> usize {
        self.counters.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
