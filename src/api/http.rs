//! Reqwest-backed [`DashboardApi`] implementation.
//!
//! Sessions are cookie-based: the server sets an auth cookie on sign-in and
//! the client's cookie store carries it on every subsequent request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ComandaError, from_status};
use crate::telemetry;
use crate::types::{
    DailyRevenue, DayOrdersAmount, ManagedRestaurant, MonthCanceledOrdersAmount,
    MonthOrdersAmount, MonthRevenue, NewRestaurant, OrderDetails, OrdersPage, OrdersQuery,
    PopularProduct, Profile, StoreProfileInput,
};
use crate::Result;

use super::DashboardApi;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body shape of server-reported failures.
#[derive(serde::Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Serialize)]
struct SignInBody<'a> {
    email: &'a str,
}

/// HTTP client for the dashboard API.
#[derive(Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: String,
}

impl HttpApiClient {
    /// Create a client against the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ComandaError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    /// Map a non-success response to an error, extracting the server message
    /// when the body carries one.
    async fn check(response: Response, endpoint: &'static str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            metrics::counter!(telemetry::REQUESTS_TOTAL, "endpoint" => endpoint, "status" => "ok")
                .increment(1);
            return Ok(response);
        }
        metrics::counter!(telemetry::REQUESTS_TOTAL, "endpoint" => endpoint, "status" => "error")
            .increment(1);
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        debug!(endpoint, status = status.as_u16(), "request failed");
        Err(from_status(status.as_u16(), message))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .request(Method::GET, path)
            .query(params)
            .send()
            .await?;
        let response = Self::check(response, endpoint).await?;
        let value = response.json().await?;
        Ok(value)
    }

    /// Issue a body-less write (the dashboard's write endpoints return 204).
    async fn send_empty(
        &self,
        method: Method,
        path: &str,
        endpoint: &'static str,
        body: Option<&impl Serialize>,
    ) -> Result<()> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::check(response, endpoint).await?;
        Ok(())
    }
}

#[async_trait]
impl DashboardApi for HttpApiClient {
    async fn get_orders(&self, query: &OrdersQuery) -> Result<OrdersPage> {
        let mut params = vec![("pageIndex", query.page_index.to_string())];
        if let Some(order_id) = &query.order_id {
            params.push(("orderId", order_id.clone()));
        }
        if let Some(customer_name) = &query.customer_name {
            params.push(("customerName", customer_name.clone()));
        }
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_string()));
        }
        self.get_json("/orders", "get_orders", &params).await
    }

    async fn get_order_details(&self, order_id: &str) -> Result<OrderDetails> {
        self.get_json(&format!("/orders/{order_id}"), "get_order_details", &[])
            .await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<()> {
        self.send_empty(
            Method::PATCH,
            &format!("/orders/{order_id}/cancel"),
            "cancel_order",
            None::<&()>,
        )
        .await
    }

    async fn approve_order(&self, order_id: &str) -> Result<()> {
        self.send_empty(
            Method::PATCH,
            &format!("/orders/{order_id}/approve"),
            "approve_order",
            None::<&()>,
        )
        .await
    }

    async fn dispatch_order(&self, order_id: &str) -> Result<()> {
        self.send_empty(
            Method::PATCH,
            &format!("/orders/{order_id}/dispatch"),
            "dispatch_order",
            None::<&()>,
        )
        .await
    }

    async fn deliver_order(&self, order_id: &str) -> Result<()> {
        self.send_empty(
            Method::PATCH,
            &format!("/orders/{order_id}/deliver"),
            "deliver_order",
            None::<&()>,
        )
        .await
    }

    async fn get_profile(&self) -> Result<Profile> {
        self.get_json("/me", "get_profile", &[]).await
    }

    async fn get_managed_restaurant(&self) -> Result<ManagedRestaurant> {
        self.get_json("/managed-restaurant", "get_managed_restaurant", &[])
            .await
    }

    async fn update_profile(&self, input: &StoreProfileInput) -> Result<()> {
        self.send_empty(Method::PUT, "/profile", "update_profile", Some(input))
            .await
    }

    async fn get_month_revenue(&self) -> Result<MonthRevenue> {
        self.get_json("/metrics/month-receipt", "get_month_revenue", &[])
            .await
    }

    async fn get_month_orders_amount(&self) -> Result<MonthOrdersAmount> {
        self.get_json("/metrics/month-orders-amount", "get_month_orders_amount", &[])
            .await
    }

    async fn get_day_orders_amount(&self) -> Result<DayOrdersAmount> {
        self.get_json("/metrics/day-orders-amount", "get_day_orders_amount", &[])
            .await
    }

    async fn get_month_canceled_orders_amount(&self) -> Result<MonthCanceledOrdersAmount> {
        self.get_json(
            "/metrics/month-canceled-orders-amount",
            "get_month_canceled_orders_amount",
            &[],
        )
        .await
    }

    async fn get_daily_revenue_in_period(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<DailyRevenue>> {
        let mut params = Vec::new();
        if let Some(from) = from {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = to {
            params.push(("to", to.to_string()));
        }
        self.get_json(
            "/metrics/daily-receipt-in-period",
            "get_daily_revenue_in_period",
            &params,
        )
        .await
    }

    async fn get_popular_products(&self) -> Result<Vec<PopularProduct>> {
        self.get_json("/metrics/popular-products", "get_popular_products", &[])
            .await
    }

    async fn sign_in(&self, email: &str) -> Result<()> {
        self.send_empty(
            Method::POST,
            "/authenticate",
            "sign_in",
            Some(&SignInBody { email }),
        )
        .await
    }

    async fn register_restaurant(&self, input: &NewRestaurant) -> Result<()> {
        self.send_empty(Method::POST, "/restaurants", "register_restaurant", Some(input))
            .await
    }

    async fn sign_out(&self) -> Result<()> {
        self.send_empty(Method::POST, "/sign-out", "sign_out", None::<&()>)
            .await
    }
}
