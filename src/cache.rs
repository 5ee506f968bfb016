// src/cache.rs
//! Explicit record cache for the service layer to inject.
//!
//! The core pipeline is stateless and never reads this — it exists so the
//! surrounding service can collapse repeated lookups without resorting to
//! module-level mutable globals. Keys are normalized titles, so punctuation
//! and numeral-style variants of the same title share an entry.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::normalize::normalize_title;
use crate::record::MovieRecord;

pub trait RecordCache: Send + Sync {
    fn get(&self, title: &str) -> Option<MovieRecord>;
    fn put(&self, title: &str, record: MovieRecord);
}

#[derive(Debug)]
struct Entry {
    stored_at: Instant,
    record: MovieRecord,
}

/// TTL + capacity bounded map. Expired entries are dropped lazily on access
/// and swept on insert; when full, the oldest entry makes room.
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    cap: usize,
    inner: RwLock<HashMap<String, Entry>>,
}

impl TtlCache {
    pub fn new(ttl: Duration, cap: usize) -> Self {
        Self {
            ttl,
            cap: cap.max(1),
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordCache for TtlCache {
    fn get(&self, title: &str) -> Option<MovieRecord> {
        let key = normalize_title(title);
        let guard = self.inner.read().ok()?;
        let entry = guard.get(&key)?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.record.clone())
    }

    fn put(&self, title: &str, record: MovieRecord) {
        let key = normalize_title(title);
        let Ok(mut guard) = self.inner.write() else {
            return;
        };

        let ttl = self.ttl;
        guard.retain(|_, e| e.stored_at.elapsed() <= ttl);

        if guard.len() >= self.cap && !guard.contains_key(&key) {
            if let Some(oldest) = guard
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone())
            {
                guard.remove(&oldest);
            }
        }

        guard.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                record,
            },
        );
    }
}
