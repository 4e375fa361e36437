//! Short-lived response cache for spot rate lookups.
//!
//! Adapters consult an injected cache before issuing a network call, which
//! bounds external call volume for hot currency pairs. The cache is a
//! collaborator owned by whoever wires the adapters together, not a
//! process-wide singleton.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Cache collaborator for spot rates.
///
/// Keys are provider-chosen; adapters key by the (source, target) pair.
pub trait RateCache: Send + Sync {
    /// Returns the cached rate for `key` if present and not expired.
    fn get(&self, key: &str) -> Option<Decimal>;

    /// Stores `rate` under `key` for `ttl`.
    fn put(&self, key: &str, rate: Decimal, ttl: Duration);
}

/// In-memory TTL cache backed by a `RwLock`ed map.
#[derive(Default)]
pub struct InMemoryRateCache {
    entries: RwLock<HashMap<String, (Decimal, Instant)>>,
}

impl InMemoryRateCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateCache for InMemoryRateCache {
    fn get(&self, key: &str) -> Option<Decimal> {
        let now = Instant::now();
        {
            let entries = self.entries.read().ok()?;
            match entries.get(key) {
                Some((rate, expires_at)) if *expires_at > now => return Some(*rate),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired entry: drop it so the map doesn't accumulate stale pairs.
        if let Ok(mut entries) = self.entries.write() {
            if let Some((_, expires_at)) = entries.get(key) {
                if *expires_at <= now {
                    entries.remove(key);
                }
            }
        }
        None
    }

    fn put(&self, key: &str, rate: Decimal, ttl: Duration) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), (rate, Instant::now() + ttl));
        }
    }
}
