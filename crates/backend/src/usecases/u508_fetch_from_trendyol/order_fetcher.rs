use async_trait::async_trait;
use contracts::enums::OrderStatus;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u508_fetch_from_trendyol::{FetchFromTrendyol, FetchStats};

use super::error::FetchError;
use super::range_splitter::DateRange;
use super::trendyol_api_client::RawOrder;

/// Источник страниц заказов (HTTP-клиент или подставной источник в тестах)
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Requested page size; a shorter page is the last one
    fn page_size(&self) -> usize;

    async fn fetch_orders_page(
        &self,
        status: OrderStatus,
        range: &DateRange,
        page: u32,
    ) -> Result<Vec<RawOrder>, FetchError>;
}

/// Orders of one (status, range) pair
#[derive(Debug, Clone)]
pub struct OrderBatch {
    pub status: OrderStatus,
    pub range: DateRange,
    pub pages: usize,
    pub orders: Vec<RawOrder>,
}

/// All batches of a run folded together
#[derive(Debug, Clone, Default)]
pub struct FetchedOrders {
    pub orders: Vec<RawOrder>,
    pub stats: FetchStats,
}

impl OrderBatch {
    pub fn stats(&self) -> FetchStats {
        FetchStats {
            pairs: 1,
            pages: self.pages,
            orders: self.orders.len(),
        }
    }

    /// Concatenate batches in the order they were fetched
    pub fn merge_all(batches: impl IntoIterator<Item = OrderBatch>) -> FetchedOrders {
        batches
            .into_iter()
            .fold(FetchedOrders::default(), |mut acc, batch| {
                acc.stats = acc.stats.add(batch.stats());
                acc.orders.extend(batch.orders);
                acc
            })
    }
}

/// Read pages 0, 1, 2, ... of one pair until an empty or short page
pub async fn fetch_range<S>(
    source: &S,
    status: OrderStatus,
    range: DateRange,
) -> Result<OrderBatch, FetchError>
where
    S: OrderSource + ?Sized,
{
    let page_size = source.page_size();
    let mut page = 0u32;
    let mut pages = 0usize;
    let mut orders = Vec::new();

    loop {
        let content = source.fetch_orders_page(status, &range, page).await?;
        pages += 1;

        let received = content.len();
        orders.extend(content);

        // page_size >= 1, so an empty page is a short page too
        if received < page_size {
            break;
        }
        page += 1;
    }

    tracing::info!(
        "Trendyol {} [{}]: {} orders in {} pages",
        status,
        range,
        orders.len(),
        pages
    );

    Ok(OrderBatch {
        status,
        range,
        pages,
        orders,
    })
}

/// Sequentially fetch every (status, range) pair.
///
/// The first failed page aborts the run; batches collected before it are dropped.
pub async fn fetch_all<S>(
    source: &S,
    statuses: &[OrderStatus],
    ranges: &[DateRange],
) -> Result<FetchedOrders, FetchError>
where
    S: OrderSource + ?Sized,
{
    tracing::info!(
        "{}: {} statuses x {} ranges",
        FetchFromTrendyol::full_name(),
        statuses.len(),
        ranges.len()
    );

    let mut batches = Vec::with_capacity(statuses.len() * ranges.len());

    for &status in statuses {
        for range in ranges {
            let batch = fetch_range(source, status, *range).await.map_err(|e| {
                tracing::error!("Fetch aborted at {} [{}]: {}", status, range, e);
                e
            })?;
            batches.push(batch);
        }
    }

    Ok(OrderBatch::merge_all(batches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::trendyol_api_client::{LineItem, PackageHistory};
    use crate::shared::time::start_of_day;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Istanbul;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves prepared pages; unknown pages are empty
    struct FakeSource {
        page_size: usize,
        pages: HashMap<(OrderStatus, u32), Vec<RawOrder>>,
        fail: Option<(OrderStatus, u32, u16)>,
        calls: Mutex<Vec<(OrderStatus, u32)>>,
    }

    impl FakeSource {
        fn new(page_size: usize) -> Self {
            Self {
                page_size,
                pages: HashMap::new(),
                fail: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_page(mut self, status: OrderStatus, page: u32, count: usize) -> Self {
            self.pages.insert((status, page), orders(count));
            self
        }

        fn failing_at(mut self, status: OrderStatus, page: u32, code: u16) -> Self {
            self.fail = Some((status, page, code));
            self
        }

        fn calls(&self) -> Vec<(OrderStatus, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OrderSource for FakeSource {
        fn page_size(&self) -> usize {
            self.page_size
        }

        async fn fetch_orders_page(
            &self,
            status: OrderStatus,
            _range: &DateRange,
            page: u32,
        ) -> Result<Vec<RawOrder>, FetchError> {
            self.calls.lock().unwrap().push((status, page));
            if let Some((fail_status, fail_page, code)) = self.fail {
                if fail_status == status && fail_page == page {
                    return Err(FetchError::Status { status, code });
                }
            }
            Ok(self.pages.get(&(status, page)).cloned().unwrap_or_default())
        }
    }

    fn orders(count: usize) -> Vec<RawOrder> {
        (0..count)
            .map(|i| RawOrder {
                package_histories: vec![PackageHistory {
                    status: Some("Created".to_string()),
                    created_date: Some(1_735_689_600_000 + i as i64),
                }],
                lines: vec![LineItem {
                    barcode: format!("B{}", i),
                    quantity: Some(1),
                    price: Some(10.0),
                }],
            })
            .collect()
    }

    fn range() -> DateRange {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        DateRange::new(start_of_day(day, Istanbul), start_of_day(day, Istanbul)).unwrap()
    }

    #[tokio::test]
    async fn test_stops_on_short_page() {
        let source = FakeSource::new(3)
            .with_page(OrderStatus::Created, 0, 3)
            .with_page(OrderStatus::Created, 1, 2);

        let batch = fetch_range(&source, OrderStatus::Created, range()).await.unwrap();

        assert_eq!(batch.orders.len(), 5);
        assert_eq!(batch.pages, 2);
        assert_eq!(
            source.calls(),
            vec![(OrderStatus::Created, 0), (OrderStatus::Created, 1)]
        );
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let source = FakeSource::new(2)
            .with_page(OrderStatus::Shipped, 0, 2)
            .with_page(OrderStatus::Shipped, 1, 2);

        let batch = fetch_range(&source, OrderStatus::Shipped, range()).await.unwrap();

        assert_eq!(batch.orders.len(), 4);
        assert_eq!(batch.pages, 3);
        assert_eq!(source.calls().last(), Some(&(OrderStatus::Shipped, 2)));
    }

    #[tokio::test]
    async fn test_fetch_all_iterates_status_then_range() {
        let source = FakeSource::new(200)
            .with_page(OrderStatus::Created, 0, 1)
            .with_page(OrderStatus::Delivered, 0, 2);
        let ranges = [range(), range()];

        let fetched = fetch_all(
            &source,
            &[OrderStatus::Created, OrderStatus::Delivered],
            &ranges,
        )
        .await
        .unwrap();

        // two ranges per status
        assert_eq!(fetched.orders.len(), 6);
        assert_eq!(
            fetched.stats,
            FetchStats {
                pairs: 4,
                pages: 4,
                orders: 6
            }
        );
        let statuses: Vec<_> = source.calls().into_iter().map(|(s, _)| s).collect();
        assert_eq!(
            statuses,
            vec![
                OrderStatus::Created,
                OrderStatus::Created,
                OrderStatus::Delivered,
                OrderStatus::Delivered
            ]
        );
    }

    #[tokio::test]
    async fn test_non_success_status_aborts_everything() {
        let source = FakeSource::new(1)
            .with_page(OrderStatus::Created, 0, 1)
            .with_page(OrderStatus::Created, 1, 1)
            .failing_at(OrderStatus::Shipped, 0, 401);

        let err = fetch_all(
            &source,
            &[
                OrderStatus::Created,
                OrderStatus::Shipped,
                OrderStatus::Delivered,
            ],
            &[range()],
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Trendyol API error (Shipped): HTTP 401");
        // Delivered is never requested
        assert!(source
            .calls()
            .iter()
            .all(|(status, _)| *status != OrderStatus::Delivered));
    }

    #[test]
    fn test_merge_all_keeps_fetch_order() {
        let batch = |status, count| OrderBatch {
            status,
            range: range(),
            pages: 1,
            orders: orders(count),
        };
        let merged = OrderBatch::merge_all(vec![
            batch(OrderStatus::Created, 2),
            batch(OrderStatus::Picking, 1),
        ]);

        assert_eq!(merged.orders.len(), 3);
        assert_eq!(merged.stats.pairs, 2);
        assert_eq!(merged.orders[2].lines[0].barcode, "B0");
        assert_eq!(merged.orders[1].lines[0].barcode, "B1");
    }

    #[test]
    fn test_merge_all_of_nothing_is_empty() {
        let merged = OrderBatch::merge_all(Vec::new());
        assert!(merged.orders.is_empty());
        assert_eq!(merged.stats, FetchStats::default());
    }
}
