//! Optimistic mutation protocol: snapshot → speculative apply → commit or
//! rollback.
//!
//! A [`MutationContext`] is created per write operation via
//! [`QueryCache::begin_mutation`]. Every cache key the mutation touches is
//! snapshotted synchronously the first time it is touched, before the
//! speculative value lands, so a rollback always restores the state the key
//! had when this mutation first saw it.
//!
//! Two concurrent mutations may touch overlapping keys. The later one
//! snapshots the earlier one's speculative state, so rolling back the later
//! does not undo the earlier still-pending change. That is accepted
//! last-write-wins behavior on snapshot ordering, not something the protocol
//! defends against.

use tracing::{debug, warn};

use crate::Result;
use crate::telemetry;

use super::key::QueryKey;
use super::store::{Entry, QueryCache};

/// In-progress optimistic write against a [`QueryCache`].
///
/// Apply speculative writes with [`set`](Self::set) /
/// [`update_prefix`](Self::update_prefix), then settle the mutation with
/// [`commit`](Self::commit). Dropping the context without committing leaves
/// the speculative state in place; call [`rollback`](Self::rollback) to
/// abandon it explicitly.
#[must_use = "a mutation context should be settled with commit() or rollback()"]
pub struct MutationContext<'a, V> {
    cache: &'a QueryCache<V>,
    snapshots: Vec<(QueryKey, Option<Entry<V>>)>,
}

impl<'a, V: Clone> MutationContext<'a, V> {
    pub(crate) fn new(cache: &'a QueryCache<V>) -> Self {
        Self {
            cache,
            snapshots: Vec::new(),
        }
    }

    /// Capture the pre-mutation entry for `key`, once per key per mutation.
    fn snapshot_once(&mut self, key: &QueryKey) {
        if !self.snapshots.iter().any(|(k, _)| k == key) {
            self.snapshots
                .push((key.clone(), self.cache.snapshot_entry(key)));
        }
    }

    /// Speculatively replace the value for a key. Subscribers re-render with
    /// the optimistic state immediately.
    pub fn set(&mut self, key: QueryKey, value: V) {
        self.snapshot_once(&key);
        self.cache.set(key, value);
    }

    /// Speculatively rewrite the value for a key in place, if one is cached.
    /// Returns whether a value was present.
    pub fn update(&mut self, key: &QueryKey, f: impl FnOnce(&mut V)) -> bool {
        match self.cache.get(key) {
            Some(mut value) => {
                self.snapshot_once(key);
                f(&mut value);
                self.cache.set(key.clone(), value);
                true
            }
            None => false,
        }
    }

    /// Speculatively rewrite every cached entry whose key starts with
    /// `prefix` — e.g. every cached page of the order listing after a single
    /// order's status changes. Returns the number of entries touched.
    pub fn update_prefix(&mut self, prefix: &QueryKey, mut f: impl FnMut(&mut V)) -> usize {
        let matched = self.cache.get_many(prefix);
        let touched = matched.len();
        for (key, mut value) in matched {
            self.snapshot_once(&key);
            f(&mut value);
            self.cache.set(key, value);
        }
        touched
    }

    /// Keys touched so far by this mutation.
    pub fn touched_keys(&self) -> impl Iterator<Item = &QueryKey> {
        self.snapshots.iter().map(|(key, _)| key)
    }

    /// Issue the remote write and settle the mutation.
    ///
    /// On success the speculative state stands (the write endpoints return
    /// no authoritative body to reconcile with; callers wanting server truth
    /// can invalidate the touched keys afterwards). On failure every touched
    /// key is restored to its snapshot — all of them, unconditionally — and
    /// the error is surfaced.
    pub async fn commit<T>(self, write: impl Future<Output = Result<T>>) -> Result<T> {
        metrics::counter!(telemetry::OPTIMISTIC_APPLIES_TOTAL).increment(1);
        match write.await {
            Ok(value) => {
                debug!(touched = self.snapshots.len(), "optimistic write committed");
                Ok(value)
            }
            Err(err) => {
                warn!(
                    touched = self.snapshots.len(),
                    error = %err,
                    "optimistic write failed, rolling back"
                );
                self.rollback();
                Err(err)
            }
        }
    }

    /// Restore every touched key to its pre-mutation snapshot.
    pub fn rollback(self) {
        metrics::counter!(telemetry::ROLLBACKS_TOTAL).increment(1);
        // Reverse order, so a key touched twice lands on its first snapshot.
        for (key, snapshot) in self.snapshots.into_iter().rev() {
            self.cache.restore_entry(&key, snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComandaError;

    fn orders_key(page: u32) -> QueryKey {
        QueryKey::new("orders").with(page)
    }

    #[tokio::test]
    async fn failed_commit_restores_snapshot_exactly() {
        let cache = QueryCache::new();
        cache.set(orders_key(0), 1u32);

        let mut ctx = cache.begin_mutation();
        ctx.set(orders_key(0), 2u32);
        assert_eq!(cache.get(&orders_key(0)), Some(2));

        let result: Result<()> = ctx
            .commit(async { Err(ComandaError::Http("boom".into())) })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.get(&orders_key(0)), Some(1));
    }

    #[tokio::test]
    async fn successful_commit_keeps_speculative_value() {
        let cache = QueryCache::new();
        cache.set(orders_key(0), 1u32);

        let mut ctx = cache.begin_mutation();
        ctx.set(orders_key(0), 2u32);
        ctx.commit(async { Ok(()) }).await.unwrap();

        assert_eq!(cache.get(&orders_key(0)), Some(2));
    }

    #[tokio::test]
    async fn rollback_removes_entries_created_by_the_mutation() {
        let cache: QueryCache<u32> = QueryCache::new();

        let mut ctx = cache.begin_mutation();
        ctx.set(orders_key(3), 9);
        let result: Result<()> = ctx
            .commit(async { Err(ComandaError::Http("boom".into())) })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.get(&orders_key(3)), None);
    }

    #[tokio::test]
    async fn update_prefix_touches_every_matching_page() {
        let cache = QueryCache::new();
        cache.set(orders_key(0), 10u32);
        cache.set(orders_key(1), 20u32);
        cache.set(QueryKey::new("profile"), 99u32);

        let mut ctx = cache.begin_mutation();
        let touched = ctx.update_prefix(&QueryKey::new("orders"), |v| *v += 1);
        assert_eq!(touched, 2);
        assert_eq!(cache.get(&orders_key(0)), Some(11));
        assert_eq!(cache.get(&orders_key(1)), Some(21));
        assert_eq!(cache.get(&QueryKey::new("profile")), Some(99));

        let result: Result<()> = ctx
            .commit(async { Err(ComandaError::Http("boom".into())) })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.get(&orders_key(0)), Some(10));
        assert_eq!(cache.get(&orders_key(1)), Some(20));
    }

    #[tokio::test]
    async fn snapshot_is_first_touch_state() {
        let cache = QueryCache::new();
        cache.set(orders_key(0), 1u32);

        let mut ctx = cache.begin_mutation();
        ctx.set(orders_key(0), 2u32);
        ctx.set(orders_key(0), 3u32);
        ctx.rollback();

        // Two speculative writes, one snapshot: the original value.
        assert_eq!(cache.get(&orders_key(0)), Some(1));
    }

    #[tokio::test]
    async fn overlapping_mutations_last_write_wins_on_snapshots() {
        let cache = QueryCache::new();
        cache.set(orders_key(0), 1u32);

        let mut first = cache.begin_mutation();
        first.set(orders_key(0), 2u32);

        // The second mutation snapshots the first one's speculative state.
        let mut second = cache.begin_mutation();
        second.set(orders_key(0), 3u32);
        second.rollback();

        // Rolling back the second lands on 2, not 1.
        assert_eq!(cache.get(&orders_key(0)), Some(2));
        first.commit(async { Ok::<(), ComandaError>(()) }).await.unwrap();
        assert_eq!(cache.get(&orders_key(0)), Some(2));
    }

    #[tokio::test]
    async fn update_skips_absent_keys() {
        let cache: QueryCache<u32> = QueryCache::new();
        let mut ctx = cache.begin_mutation();
        assert!(!ctx.update(&orders_key(0), |v| *v += 1));
        assert_eq!(ctx.touched_keys().count(), 0);
        ctx.commit(async { Ok::<(), ComandaError>(()) }).await.unwrap();
    }
}
