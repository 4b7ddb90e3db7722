//! Remote API collaborator.
//!
//! [`DashboardApi`] is the seam between the cache layer and the wire: the
//! facade talks to the trait, [`HttpApiClient`] implements it over HTTP, and
//! tests substitute stub implementations.

mod http;

pub use http::HttpApiClient;

use async_trait::async_trait;

use crate::Result;
use crate::types::{
    DailyRevenue, DayOrdersAmount, ManagedRestaurant, MonthCanceledOrdersAmount,
    MonthOrdersAmount, MonthRevenue, NewRestaurant, OrderDetails, OrdersPage, OrdersQuery,
    PopularProduct, Profile, StoreProfileInput,
};

/// Stateless request/response operations against the remote dashboard API.
///
/// No business logic lives here: each method maps one endpoint, and errors
/// come back already converted into [`ComandaError`](crate::ComandaError).
#[async_trait]
pub trait DashboardApi: Send + Sync {
    // Orders
    async fn get_orders(&self, query: &OrdersQuery) -> Result<OrdersPage>;
    async fn get_order_details(&self, order_id: &str) -> Result<OrderDetails>;
    async fn cancel_order(&self, order_id: &str) -> Result<()>;
    async fn approve_order(&self, order_id: &str) -> Result<()>;
    async fn dispatch_order(&self, order_id: &str) -> Result<()>;
    async fn deliver_order(&self, order_id: &str) -> Result<()>;

    // Profile & restaurant
    async fn get_profile(&self) -> Result<Profile>;
    async fn get_managed_restaurant(&self) -> Result<ManagedRestaurant>;
    async fn update_profile(&self, input: &StoreProfileInput) -> Result<()>;

    // Metrics
    async fn get_month_revenue(&self) -> Result<MonthRevenue>;
    async fn get_month_orders_amount(&self) -> Result<MonthOrdersAmount>;
    async fn get_day_orders_amount(&self) -> Result<DayOrdersAmount>;
    async fn get_month_canceled_orders_amount(&self) -> Result<MonthCanceledOrdersAmount>;
    async fn get_daily_revenue_in_period(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<DailyRevenue>>;
    async fn get_popular_products(&self) -> Result<Vec<PopularProduct>>;

    // Auth
    async fn sign_in(&self, email: &str) -> Result<()>;
    async fn register_restaurant(&self, input: &NewRestaurant) -> Result<()>;
    async fn sign_out(&self) -> Result<()>;
}
