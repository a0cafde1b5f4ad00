use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::StatusFilter;
use crate::usecases::u508_fetch_from_trendyol::FetchStats;

/// Request for the sales dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDashboardRequest {
    /// First day of the period (inclusive)
    pub date_from: NaiveDate,
    /// Last day of the period (inclusive)
    pub date_to: NaiveDate,
    /// Status selector, "All" when omitted
    #[serde(default)]
    pub status: StatusFilter,
}

impl SalesDashboardRequest {
    pub fn is_valid_range(&self) -> bool {
        self.date_from <= self.date_to
    }
}

/// Response for the sales dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDashboardResponse {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub status: StatusFilter,
    /// What was requested from the marketplace for this run
    #[serde(default)]
    pub fetch: FetchStats,
    pub outcome: DashboardOutcome,
}

/// Result of one dashboard run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardOutcome {
    Ready(SalesDashboard),
    Empty { reason: EmptyReason, message: String },
}

impl DashboardOutcome {
    pub fn empty(reason: EmptyReason) -> Self {
        DashboardOutcome::Empty {
            reason,
            message: reason.message().to_string(),
        }
    }

    pub fn as_ready(&self) -> Option<&SalesDashboard> {
        match self {
            DashboardOutcome::Ready(dashboard) => Some(dashboard),
            DashboardOutcome::Empty { .. } => None,
        }
    }
}

/// Why the pipeline stopped without data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// API returned no orders for any status/range
    NoOrders,
    /// Orders were returned but none has a "Created" package history entry
    NoCreatedHistory,
    /// Every record fell outside the requested period
    OutsideWindow,
}

impl EmptyReason {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyReason::NoOrders => "No orders found in the selected range",
            EmptyReason::NoCreatedHistory => "No order data found",
            EmptyReason::OutsideWindow => "No orders in the selected date range",
        }
    }
}

/// Finished aggregate tables handed to the presenter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesDashboard {
    pub summary: SalesSummary,
    /// Top 10 brands by quantity
    pub top_brands: Vec<RollupRow>,
    /// Top 10 categories by quantity
    pub top_categories: Vec<RollupRow>,
    /// Every product group, descending by quantity
    pub products: Vec<AggregateRow>,
}

/// Grand totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub total_quantity: i64,
    /// Number of distinct product groups
    pub product_count: usize,
}

/// One product group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub product_main_id: String,
    pub image: String,
    pub product_url: String,
    pub brand: String,
    pub category_name: String,
    pub total_quantity: i64,
    pub total_revenue: f64,
}

/// Brand or category rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupRow {
    pub key: String,
    pub total_quantity: i64,
    pub total_revenue: f64,
}
