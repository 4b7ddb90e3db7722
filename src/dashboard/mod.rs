//! High-level dashboard facade.
//!
//! [`Dashboard`] ties the remote API client and the cache layer together:
//! it owns the concrete query keys, freshness policies, and optimistic
//! updates of the restaurant-management dashboard. Views are expected to
//! call the typed read operations and/or subscribe to the keys they render;
//! the facade never pushes anything UI-specific.

mod builder;

pub use builder::{Comanda, ComandaBuilder};

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::api::DashboardApi;
use crate::cache::{FetchCoordinator, QueryCache, QueryKey, StaleTime};
use crate::error::ComandaError;
use crate::types::{
    DailyRevenue, DayOrdersAmount, ManagedRestaurant, MonthCanceledOrdersAmount,
    MonthOrdersAmount, MonthRevenue, NewRestaurant, OrderDetails, OrderStatus, OrdersPage,
    OrdersQuery, PopularProduct, Profile, StoreProfileInput,
};
use crate::Result;

/// Root segments of the dashboard's query keys.
const ORDERS: &str = "orders";
const ORDER_DETAILS: &str = "order-details";
const PROFILE: &str = "profile";
const MANAGED_RESTAURANT: &str = "managed-restaurant";
const METRICS: &str = "metrics";

/// Key for one filtered page of the order listing. Every filter combination
/// caches independently; they all share the `["orders"]` prefix so a status
/// change can rewrite every cached page in one pass.
pub fn orders_key(query: &OrdersQuery) -> QueryKey {
    QueryKey::new(ORDERS)
        .with(query.page_index)
        .with(query.order_id.as_ref())
        .with(query.customer_name.as_ref())
        .with(query.status.map(OrderStatus::as_str))
}

/// Key for a single order's detail view.
pub fn order_details_key(order_id: &str) -> QueryKey {
    QueryKey::new(ORDER_DETAILS).with(order_id)
}

/// Key for the signed-in user's profile.
pub fn profile_key() -> QueryKey {
    QueryKey::new(PROFILE)
}

/// Key for the managed restaurant.
pub fn managed_restaurant_key() -> QueryKey {
    QueryKey::new(MANAGED_RESTAURANT)
}

/// Key for a single-value metric card.
pub fn metric_key(name: &str) -> QueryKey {
    QueryKey::new(METRICS).with(name)
}

/// Key for the daily revenue series over an optional date range.
pub fn daily_revenue_key(from: Option<&str>, to: Option<&str>) -> QueryKey {
    QueryKey::new(METRICS).with("daily-revenue").with(from).with(to)
}

/// Everything the dashboard caches, one variant per response shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Orders(OrdersPage),
    OrderDetails(OrderDetails),
    Profile(Profile),
    Restaurant(ManagedRestaurant),
    MonthRevenue(MonthRevenue),
    MonthOrders(MonthOrdersAmount),
    DayOrders(DayOrdersAmount),
    MonthCanceled(MonthCanceledOrdersAmount),
    DailyRevenue(Vec<DailyRevenue>),
    PopularProducts(Vec<PopularProduct>),
}

fn type_mismatch(expected: &str, key: &QueryKey) -> ComandaError {
    // Reachable only if a key is reused across response shapes.
    ComandaError::Data(format!("cache entry for {key} is not {expected}"))
}

/// Session-scoped dashboard client: typed reads through the cache, writes
/// through the optimistic-mutation protocol.
pub struct Dashboard {
    api: Arc<dyn DashboardApi>,
    fetcher: FetchCoordinator<CachedValue>,
    /// Freshness horizon for listings and metrics. Profile and restaurant
    /// are always cached forever, matching their explicit-invalidation
    /// lifecycle.
    stale_time: StaleTime,
}

impl Dashboard {
    /// Create a dashboard over any [`DashboardApi`] implementation.
    pub fn new(api: Arc<dyn DashboardApi>, stale_time: StaleTime) -> Self {
        Self {
            api,
            fetcher: FetchCoordinator::new(Arc::new(QueryCache::new())),
            stale_time,
        }
    }

    /// The shared query cache, for direct reads, invalidation, or custom
    /// subscriptions.
    pub fn cache(&self) -> &Arc<QueryCache<CachedValue>> {
        self.fetcher.store()
    }

    /// Subscribe to a query key; see [`QueryCache::subscribe`].
    pub fn subscribe(&self, key: &QueryKey) -> watch::Receiver<Option<CachedValue>> {
        self.cache().subscribe(key)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// One page of the order listing, per the query's filters.
    pub async fn orders(&self, query: &OrdersQuery) -> Result<OrdersPage> {
        let key = orders_key(query);
        let api = Arc::clone(&self.api);
        let query = query.clone();
        let value = self
            .fetcher
            .query(key.clone(), self.stale_time, move || async move {
                api.get_orders(&query).await.map(CachedValue::Orders)
            })
            .await?;
        match value {
            CachedValue::Orders(page) => Ok(page),
            _ => Err(type_mismatch("an order listing", &key)),
        }
    }

    /// Full detail for one order.
    pub async fn order_details(&self, order_id: &str) -> Result<OrderDetails> {
        let key = order_details_key(order_id);
        let api = Arc::clone(&self.api);
        let id = order_id.to_string();
        let value = self
            .fetcher
            .query(key.clone(), self.stale_time, move || async move {
                api.get_order_details(&id).await.map(CachedValue::OrderDetails)
            })
            .await?;
        match value {
            CachedValue::OrderDetails(details) => Ok(details),
            _ => Err(type_mismatch("an order detail", &key)),
        }
    }

    /// The signed-in user's profile. Cached for the session.
    pub async fn profile(&self) -> Result<Profile> {
        let key = profile_key();
        let api = Arc::clone(&self.api);
        let value = self
            .fetcher
            .query(key.clone(), StaleTime::Forever, move || async move {
                api.get_profile().await.map(CachedValue::Profile)
            })
            .await?;
        match value {
            CachedValue::Profile(profile) => Ok(profile),
            _ => Err(type_mismatch("a profile", &key)),
        }
    }

    /// The managed restaurant. Cached for the session.
    pub async fn managed_restaurant(&self) -> Result<ManagedRestaurant> {
        let key = managed_restaurant_key();
        let api = Arc::clone(&self.api);
        let value = self
            .fetcher
            .query(key.clone(), StaleTime::Forever, move || async move {
                api.get_managed_restaurant().await.map(CachedValue::Restaurant)
            })
            .await?;
        match value {
            CachedValue::Restaurant(restaurant) => Ok(restaurant),
            _ => Err(type_mismatch("a restaurant", &key)),
        }
    }

    /// Current-month revenue card.
    pub async fn month_revenue(&self) -> Result<MonthRevenue> {
        let key = metric_key("month-revenue");
        let api = Arc::clone(&self.api);
        let value = self
            .fetcher
            .query(key.clone(), self.stale_time, move || async move {
                api.get_month_revenue().await.map(CachedValue::MonthRevenue)
            })
            .await?;
        match value {
            CachedValue::MonthRevenue(metric) => Ok(metric),
            _ => Err(type_mismatch("a revenue metric", &key)),
        }
    }

    /// Current-month order-count card.
    pub async fn month_orders_amount(&self) -> Result<MonthOrdersAmount> {
        let key = metric_key("month-orders-amount");
        let api = Arc::clone(&self.api);
        let value = self
            .fetcher
            .query(key.clone(), self.stale_time, move || async move {
                api.get_month_orders_amount().await.map(CachedValue::MonthOrders)
            })
            .await?;
        match value {
            CachedValue::MonthOrders(metric) => Ok(metric),
            _ => Err(type_mismatch("an order-count metric", &key)),
        }
    }

    /// Today's order-count card.
    pub async fn day_orders_amount(&self) -> Result<DayOrdersAmount> {
        let key = metric_key("day-orders-amount");
        let api = Arc::clone(&self.api);
        let value = self
            .fetcher
            .query(key.clone(), self.stale_time, move || async move {
                api.get_day_orders_amount().await.map(CachedValue::DayOrders)
            })
            .await?;
        match value {
            CachedValue::DayOrders(metric) => Ok(metric),
            _ => Err(type_mismatch("an order-count metric", &key)),
        }
    }

    /// Current-month canceled-order card.
    pub async fn month_canceled_orders_amount(&self) -> Result<MonthCanceledOrdersAmount> {
        let key = metric_key("month-canceled-orders-amount");
        let api = Arc::clone(&self.api);
        let value = self
            .fetcher
            .query(key.clone(), self.stale_time, move || async move {
                api.get_month_canceled_orders_amount()
                    .await
                    .map(CachedValue::MonthCanceled)
            })
            .await?;
        match value {
            CachedValue::MonthCanceled(metric) => Ok(metric),
            _ => Err(type_mismatch("an order-count metric", &key)),
        }
    }

    /// Daily revenue series for the chart, optionally bounded by RFC 3339
    /// dates.
    pub async fn daily_revenue_in_period(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<DailyRevenue>> {
        let key = daily_revenue_key(from, to);
        let api = Arc::clone(&self.api);
        let from = from.map(str::to_string);
        let to = to.map(str::to_string);
        let value = self
            .fetcher
            .query(key.clone(), self.stale_time, move || async move {
                api.get_daily_revenue_in_period(from.as_deref(), to.as_deref())
                    .await
                    .map(CachedValue::DailyRevenue)
            })
            .await?;
        match value {
            CachedValue::DailyRevenue(series) => Ok(series),
            _ => Err(type_mismatch("a revenue series", &key)),
        }
    }

    /// Popular-products ranking.
    pub async fn popular_products(&self) -> Result<Vec<PopularProduct>> {
        let key = metric_key("popular-products");
        let api = Arc::clone(&self.api);
        let value = self
            .fetcher
            .query(key.clone(), self.stale_time, move || async move {
                api.get_popular_products().await.map(CachedValue::PopularProducts)
            })
            .await?;
        match value {
            CachedValue::PopularProducts(ranking) => Ok(ranking),
            _ => Err(type_mismatch("a product ranking", &key)),
        }
    }

    // ------------------------------------------------------------------
    // Writes (optimistic)
    // ------------------------------------------------------------------

    /// Speculatively move one order to `status` in every cached listing page
    /// and its detail entry, then issue the remote write; rolls back on
    /// failure.
    async fn transition_order(
        &self,
        order_id: &str,
        status: OrderStatus,
        write: impl Future<Output = Result<()>>,
    ) -> Result<()> {
        let mut ctx = self.cache().begin_mutation();
        ctx.update_prefix(&QueryKey::new(ORDERS), |value| {
            if let CachedValue::Orders(page) = value {
                for order in &mut page.orders {
                    if order.order_id == order_id {
                        order.status = status;
                    }
                }
            }
        });
        ctx.update(&order_details_key(order_id), |value| {
            if let CachedValue::OrderDetails(details) = value {
                details.status = status;
            }
        });
        ctx.commit(write).await
    }

    /// Cancel an order. The canceled status shows up in every cached listing
    /// page immediately and reverts if the server refuses.
    pub async fn cancel_order(&self, order_id: &str) -> Result<()> {
        self.transition_order(order_id, OrderStatus::Canceled, self.api.cancel_order(order_id))
            .await
    }

    /// Approve a pending order, moving it to `processing`.
    pub async fn approve_order(&self, order_id: &str) -> Result<()> {
        self.transition_order(
            order_id,
            OrderStatus::Processing,
            self.api.approve_order(order_id),
        )
        .await
    }

    /// Hand an order to delivery, moving it to `delivering`.
    pub async fn dispatch_order(&self, order_id: &str) -> Result<()> {
        self.transition_order(
            order_id,
            OrderStatus::Delivering,
            self.api.dispatch_order(order_id),
        )
        .await
    }

    /// Mark an order delivered.
    pub async fn deliver_order(&self, order_id: &str) -> Result<()> {
        self.transition_order(
            order_id,
            OrderStatus::Delivered,
            self.api.deliver_order(order_id),
        )
        .await
    }

    /// Update the store profile (name and description).
    ///
    /// Validation happens first and never reaches the cache or the network;
    /// the cached restaurant is then rewritten speculatively and rolled back
    /// if the server rejects the write.
    pub async fn update_store_profile(&self, input: StoreProfileInput) -> Result<()> {
        input.validate()?;
        let mut ctx = self.cache().begin_mutation();
        ctx.update(&managed_restaurant_key(), |value| {
            if let CachedValue::Restaurant(restaurant) = value {
                restaurant.name = input.name.clone();
                restaurant.description = input.description.clone();
            }
        });
        ctx.commit(self.api.update_profile(&input)).await
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    /// Request a sign-in link for `email`.
    pub async fn sign_in(&self, email: &str) -> Result<()> {
        if !email.contains('@') {
            return Err(ComandaError::Validation(format!("invalid email: {email}")));
        }
        self.api.sign_in(email).await
    }

    /// Register a new restaurant and manager account.
    pub async fn register_restaurant(&self, input: &NewRestaurant) -> Result<()> {
        input.validate()?;
        self.api.register_restaurant(input).await
    }

    /// End the session: invalidates it server-side, then drops the whole
    /// session-scoped cache.
    pub async fn sign_out(&self) -> Result<()> {
        self.api.sign_out().await?;
        self.cache().clear();
        info!("signed out, cache cleared");
        Ok(())
    }
}
