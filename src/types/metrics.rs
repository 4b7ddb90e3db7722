//! Dashboard metric card types, `GET /metrics/*`.
//!
//! Each single-value metric carries a signed percentage delta against the
//! previous period, which the server computes.

use serde::{Deserialize, Serialize};

/// Current-month gross revenue in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRevenue {
    pub receipt: i64,
    pub diff_from_last_month: f64,
}

/// Current-month order count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOrdersAmount {
    pub amount: u64,
    pub diff_from_last_month: f64,
}

/// Today's order count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOrdersAmount {
    pub amount: u64,
    pub diff_from_yesterday: f64,
}

/// Current-month canceled-order count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCanceledOrdersAmount {
    pub amount: u64,
    pub diff_from_last_month: f64,
}

/// One point of the daily revenue series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: String,
    /// Revenue for the day in cents.
    pub receipt: i64,
}

/// One entry of the popular-products ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularProduct {
    pub product: String,
    pub amount: u64,
}
