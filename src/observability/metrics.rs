//! Per-store operation counters
//!
//! Counters only, monotonic, relaxed atomics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    saves: AtomicU64,
    loads: AtomicU64,
    listings: AtomicU64,
    existence_checks: AtomicU64,
    documents_inserted: AtomicU64,
    leaf_updates: AtomicU64,
    writes_rejected: AtomicU64,
    keys_missing: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_saves(&self) {
        self.saves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_loads(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_listings(&self) {
        self.listings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_existence_checks(&self) {
        self.existence_checks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_documents_inserted(&self) {
        self.documents_inserted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_leaf_updates(&self) {
        self.leaf_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_writes_rejected(&self) {
        self.writes_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_keys_missing(&self) {
        self.keys_missing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            saves: self.saves.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            listings: self.listings.load(Ordering::Relaxed),
            existence_checks: self.existence_checks.load(Ordering::Relaxed),
            documents_inserted: self.documents_inserted.load(Ordering::Relaxed),
            leaf_updates: self.leaf_updates.load(Ordering::Relaxed),
            writes_rejected: self.writes_rejected.load(Ordering::Relaxed),
            keys_missing: self.keys_missing.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub saves: u64,
    pub loads: u64,
    pub listings: u64,
    pub existence_checks: u64,
    pub documents_inserted: u64,
    pub leaf_updates: u64,
    pub writes_rejected: u64,
    pub keys_missing: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_zero() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.saves, 0);
        assert_eq!(snapshot.documents_inserted, 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.increment_saves();
        registry.increment_documents_inserted();
        registry.increment_documents_inserted();

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["saves"], 1);
        assert_eq!(json["documents_inserted"], 2);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.increment_loads();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.snapshot().loads, 800);
    }
}
