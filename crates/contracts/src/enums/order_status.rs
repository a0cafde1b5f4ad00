use serde::{Deserialize, Serialize};

/// Статус отправления (package) в Trendyol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Created,
    Shipped,
    Delivered,
    Invoiced,
    Picking,
}

impl OrderStatus {
    /// Value of the `status` query parameter
    pub fn code(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Invoiced => "Invoiced",
            OrderStatus::Picking => "Picking",
        }
    }

    /// All statuses in fetch order
    pub fn all() -> Vec<OrderStatus> {
        vec![
            OrderStatus::Created,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Invoiced,
            OrderStatus::Picking,
        ]
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Status selector of the dashboard: either every status or a single one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Created,
    Shipped,
    Delivered,
    Invoiced,
    Picking,
}

impl StatusFilter {
    /// Statuses that have to be requested from the API
    pub fn statuses(&self) -> Vec<OrderStatus> {
        match self {
            StatusFilter::All => OrderStatus::all(),
            StatusFilter::Created => vec![OrderStatus::Created],
            StatusFilter::Shipped => vec![OrderStatus::Shipped],
            StatusFilter::Delivered => vec![OrderStatus::Delivered],
            StatusFilter::Invoiced => vec![OrderStatus::Invoiced],
            StatusFilter::Picking => vec![OrderStatus::Picking],
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Created => f.write_str("Created"),
            StatusFilter::Shipped => f.write_str("Shipped"),
            StatusFilter::Delivered => f.write_str("Delivered"),
            StatusFilter::Invoiced => f.write_str("Invoiced"),
            StatusFilter::Picking => f.write_str("Picking"),
        }
    }
}
