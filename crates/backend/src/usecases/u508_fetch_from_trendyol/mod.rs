pub mod error;
pub mod order_fetcher;
pub mod range_splitter;
pub mod trendyol_api_client;

pub use error::FetchError;
pub use order_fetcher::{fetch_all, FetchedOrders, OrderBatch, OrderSource};
pub use range_splitter::{DateRange, RangeSplitter};
pub use trendyol_api_client::{LineItem, PackageHistory, RawOrder, TrendyolApiClient};
