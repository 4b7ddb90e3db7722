//! Keyed cache store.
//!
//! [`QueryCache`] maps a [`QueryKey`] to the most recent known value for that
//! key. Values are replaced wholesale; the only field-level rewrites happen
//! inside the optimistic-mutation protocol ([`super::MutationContext`]),
//! which goes through the same `set` path and therefore notifies subscribers
//! like any other write.
//!
//! The store is process-wide state shared by every logical call chain of the
//! session. All access goes through one mutex that is never held across an
//! await, so interleaved async operations serialize cleanly; code that spans
//! an await must re-read rather than trust a value captured before the
//! suspension.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use super::key::QueryKey;
use super::mutation::MutationContext;

/// Staleness horizon for a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleTime {
    /// Eligible for automatic refetch once this long has passed since the
    /// last successful fetch.
    After(Duration),
    /// Never considered stale; refetched only after explicit invalidation.
    Forever,
}

impl Default for StaleTime {
    /// Always stale — every query revalidates.
    fn default() -> Self {
        StaleTime::After(Duration::ZERO)
    }
}

/// A cached value together with its freshness bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    pub(crate) value: V,
    pub(crate) fetched_at: Instant,
    pub(crate) stale_time: StaleTime,
    /// Set by explicit invalidation; cleared by the next successful fetch.
    pub(crate) invalidated: bool,
}

impl<V> Entry<V> {
    pub(crate) fn is_fresh(&self, now: Instant) -> bool {
        if self.invalidated {
            return false;
        }
        match self.stale_time {
            StaleTime::Forever => true,
            StaleTime::After(d) => now.duration_since(self.fetched_at) < d,
        }
    }
}

/// One key's slot: the entry (if ever written) plus its subscriber channel.
struct Slot<V> {
    entry: Option<Entry<V>>,
    watch: Option<watch::Sender<Option<V>>>,
}

impl<V> Slot<V> {
    fn empty() -> Self {
        Slot {
            entry: None,
            watch: None,
        }
    }
}

/// In-memory, session-scoped store of fetched server data, keyed by
/// [`QueryKey`].
///
/// Entries are created on first write and live until [`clear`](Self::clear)
/// (session teardown); there is no eviction. The backing map is ordered so
/// [`get_many`](Self::get_many) is a range scan.
pub struct QueryCache<V> {
    slots: Mutex<BTreeMap<QueryKey, Slot<V>>>,
}

impl<V: Clone> QueryCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<QueryKey, Slot<V>>> {
        self.slots.lock().expect("query cache lock poisoned")
    }

    /// Current cached value for a key, without any fetch side effects.
    pub fn get(&self, key: &QueryKey) -> Option<V> {
        self.lock()
            .get(key)
            .and_then(|slot| slot.entry.as_ref())
            .map(|entry| entry.value.clone())
    }

    /// Replace the cached value for a key wholesale and notify subscribers.
    ///
    /// Freshness bookkeeping of a previously fetched entry is preserved: a
    /// local rewrite does not change when the server was last consulted.
    pub fn set(&self, key: QueryKey, value: V) {
        let mut slots = self.lock();
        let slot = slots.entry(key).or_insert_with(Slot::empty);
        match &mut slot.entry {
            Some(entry) => entry.value = value.clone(),
            None => {
                slot.entry = Some(Entry {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                    stale_time: StaleTime::default(),
                    invalidated: false,
                });
            }
        }
        if let Some(tx) = &slot.watch {
            // send_replace keeps the stored value current even while no
            // receiver is alive, so late subscribers see the latest write.
            tx.send_replace(Some(value));
        }
    }

    /// Record a successful fetch result: replaces the value, refreshes the
    /// freshness timestamp, clears invalidation, and notifies subscribers.
    pub(crate) fn store_fetched(&self, key: QueryKey, value: V, stale_time: StaleTime) {
        let mut slots = self.lock();
        let slot = slots.entry(key).or_insert_with(Slot::empty);
        slot.entry = Some(Entry {
            value: value.clone(),
            fetched_at: Instant::now(),
            stale_time,
            invalidated: false,
        });
        if let Some(tx) = &slot.watch {
            tx.send_replace(Some(value));
        }
    }

    /// All cached entries whose key starts with `prefix`, in key order.
    pub fn get_many(&self, prefix: &QueryKey) -> Vec<(QueryKey, V)> {
        let slots = self.lock();
        slots
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter_map(|(key, slot)| {
                slot.entry
                    .as_ref()
                    .map(|entry| (key.clone(), entry.value.clone()))
            })
            .collect()
    }

    /// Mark a key stale without dropping its value (stale data is preferred
    /// over no data). The next query for the key revalidates.
    pub fn invalidate(&self, key: &QueryKey) {
        let mut slots = self.lock();
        if let Some(entry) = slots.get_mut(key).and_then(|slot| slot.entry.as_mut()) {
            entry.invalidated = true;
        }
    }

    /// Invalidate every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &QueryKey) {
        let mut slots = self.lock();
        for (_, slot) in slots
            .range_mut(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            if let Some(entry) = slot.entry.as_mut() {
                entry.invalidated = true;
            }
        }
    }

    /// Register interest in a key. The receiver holds the latest value
    /// (`None` until first write) and resolves `changed()` on every write,
    /// rollback, or removal.
    pub fn subscribe(&self, key: &QueryKey) -> watch::Receiver<Option<V>> {
        let mut slots = self.lock();
        let slot = slots.entry(key.clone()).or_insert_with(Slot::empty);
        match &slot.watch {
            Some(tx) => tx.subscribe(),
            None => {
                let current = slot.entry.as_ref().map(|entry| entry.value.clone());
                let (tx, rx) = watch::channel(current);
                slot.watch = Some(tx);
                rx
            }
        }
    }

    /// Begin an optimistic mutation against this cache.
    pub fn begin_mutation(&self) -> MutationContext<'_, V> {
        MutationContext::new(self)
    }

    /// Drop every entry and notify subscribers with `None`. Session teardown.
    pub fn clear(&self) {
        let mut slots = self.lock();
        for slot in slots.values_mut() {
            slot.entry = None;
            if let Some(tx) = &slot.watch {
                tx.send_replace(None);
            }
        }
    }

    /// Number of keys holding a value.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| slot.entry.is_some())
            .count()
    }

    /// Whether no key holds a value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ------------------------------------------------------------------
    // Snapshot/restore primitives for the mutation protocol.
    // ------------------------------------------------------------------

    /// Full entry snapshot (value + freshness bookkeeping) for rollback.
    pub(crate) fn snapshot_entry(&self, key: &QueryKey) -> Option<Entry<V>> {
        self.lock().get(key).and_then(|slot| slot.entry.clone())
    }

    /// Restore a key to a previously captured snapshot. `None` removes the
    /// entry. Subscribers are notified either way.
    pub(crate) fn restore_entry(&self, key: &QueryKey, snapshot: Option<Entry<V>>) {
        let mut slots = self.lock();
        let slot = slots.entry(key.clone()).or_insert_with(Slot::empty);
        let current = snapshot.as_ref().map(|entry| entry.value.clone());
        slot.entry = snapshot;
        if let Some(tx) = &slot.watch {
            tx.send_replace(current);
        }
    }

    /// Whether the entry for `key` is currently fresh. `None` if absent.
    pub(crate) fn freshness(&self, key: &QueryKey, now: Instant) -> Option<(V, bool)> {
        self.lock()
            .get(key)
            .and_then(|slot| slot.entry.as_ref())
            .map(|entry| (entry.value.clone(), entry.is_fresh(now)))
    }
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
