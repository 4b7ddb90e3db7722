//! Order listing and detail types.
//!
//! Monetary amounts are integer cents, as served by the API. Timestamps are
//! kept as the RFC 3339 strings the server sends; the crate never does date
//! arithmetic on them.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Canceled,
    Processing,
    Delivering,
    Delivered,
}

impl OrderStatus {
    /// Whether a cancel request is accepted for an order in this status.
    pub fn cancelable(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Wire representation, as used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Processing => "processing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
        }
    }
}

/// Filters for the paginated order listing.
///
/// `page_index` is zero-based. The remaining fields narrow the listing and
/// participate in the query key, so each filter combination caches
/// independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersQuery {
    pub page_index: u32,
    pub order_id: Option<String>,
    pub customer_name: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrdersQuery {
    /// Listing query for a page with no filters.
    pub fn page(page_index: u32) -> Self {
        Self {
            page_index,
            ..Self::default()
        }
    }
}

/// One row of the order listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub created_at: String,
    pub status: OrderStatus,
    pub customer_name: String,
    /// Order total in cents.
    pub total: i64,
}

/// Pagination envelope returned alongside every listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page_index: u32,
    pub per_page: u32,
    pub total_count: u64,
}

/// One page of the order listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    pub meta: PageMeta,
}

/// Customer block of an order detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Line item of an order detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub price_in_cents: i64,
    pub quantity: u32,
    pub product: ProductRef,
}

/// Product reference inside a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub name: String,
}

/// Full order detail, as returned by `GET /orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub id: String,
    pub created_at: String,
    pub status: OrderStatus,
    pub total_in_cents: i64,
    pub customer: OrderCustomer,
    pub order_items: Vec<OrderItem>,
}
