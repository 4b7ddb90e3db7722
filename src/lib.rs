//! Comanda — typed client and optimistic cache layer for a
//! restaurant-management dashboard API.
//!
//! The crate is the non-UI half of a management dashboard: a typed async
//! client for the remote HTTP API (orders, metrics, profile, auth) plus a
//! client-side keyed cache with fetch deduplication, stale-while-revalidate
//! freshness, subscriptions, and an optimistic-mutation/rollback protocol.
//! Views bind to cache keys via [`Dashboard::subscribe`] and re-render on
//! change; how they render is their business.
//!
//! # Example
//!
//! ```rust,no_run
//! use comanda::{Comanda, OrdersQuery};
//!
//! #[tokio::main]
//! async fn main() -> comanda::Result<()> {
//!     let dashboard = Comanda::builder()
//!         .base_url("https://api.example-restaurant.dev")
//!         .build()?;
//!
//!     dashboard.sign_in("manager@example.dev").await?;
//!
//!     // Concurrent reads of the same key share one network call, and the
//!     // result is cached for later page views.
//!     let page = dashboard.orders(&OrdersQuery::page(0)).await?;
//!     println!("{} orders", page.meta.total_count);
//!
//!     // Cancelling is optimistic: every cached listing page flips the
//!     // order to `canceled` immediately and reverts if the server refuses.
//!     if let Some(order) = page.orders.first() {
//!         dashboard.cancel_order(&order.order_id).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod dashboard;
pub mod error;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use api::{DashboardApi, HttpApiClient};
pub use cache::{FetchCoordinator, KeyPart, MutationContext, QueryCache, QueryKey, StaleTime};
pub use dashboard::{CachedValue, Comanda, ComandaBuilder, Dashboard};
pub use error::{ComandaError, Result};

// Re-export all DTOs
pub use types::{
    DailyRevenue, DayOrdersAmount, ManagedRestaurant, MonthCanceledOrdersAmount,
    MonthOrdersAmount, MonthRevenue, NewRestaurant, Order, OrderCustomer, OrderDetails, OrderItem,
    OrderStatus, OrdersPage, OrdersQuery, PageMeta, PopularProduct, ProductRef, Profile, Role,
    StoreProfileInput,
};
