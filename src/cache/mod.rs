//! Client-side cache and optimistic-update layer.
//!
//! Three cooperating pieces:
//!
//! - [`QueryCache`] — keyed in-memory store of previously fetched server
//!   data. Values are addressed by [`QueryKey`] (an ordered tuple of
//!   primitives), replaced wholesale, enumerable by key prefix, and
//!   observable through [`QueryCache::subscribe`].
//!
//! - [`FetchCoordinator`] — executes remote fetches with at most one
//!   in-flight request per key and a stale-while-revalidate freshness
//!   policy ([`StaleTime`]).
//!
//! - [`MutationContext`] — the optimistic-write protocol: snapshot the
//!   touched entries, apply the speculative state synchronously (views
//!   re-render immediately), then commit the remote write or roll every
//!   touched key back on failure.
//!
//! Concurrency is interleaved-async, not parallel-by-design: one mutex
//! guards the store and one the in-flight map, neither is ever held across
//! an await, and anything spanning a suspension point re-reads the cache
//! instead of trusting a pre-suspension copy.

mod fetch;
mod key;
mod mutation;
mod store;

pub use fetch::FetchCoordinator;
pub use key::{KeyPart, QueryKey};
pub use mutation::MutationContext;
pub use store::{QueryCache, StaleTime};
