use serde::{Deserialize, Serialize};

/// Counters of one fetch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStats {
    /// (status, range) pairs requested
    pub pairs: usize,
    /// Pages received, including the terminating empty ones
    pub pages: usize,
    pub orders: usize,
}

impl FetchStats {
    pub fn add(self, other: FetchStats) -> FetchStats {
        FetchStats {
            pairs: self.pairs + other.pairs,
            pages: self.pages + other.pages,
            orders: self.orders + other.orders,
        }
    }
}
