use chrono::DateTime;
use chrono_tz::Tz;

use crate::shared::time::from_epoch_millis;
use crate::usecases::u508_fetch_from_trendyol::RawOrder;

/// Package history status that marks when an order was placed
pub const CREATED_STATUS: &str = "Created";

/// Одна строка заказа с датой создания
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    pub created_date: DateTime<Tz>,
    pub barcode: String,
    pub quantity: i64,
    pub price: f64,
    pub revenue: f64,
}

/// Creation time of an order: the first "Created" history entry with a non-zero date
pub fn created_date(order: &RawOrder, tz: Tz) -> Option<DateTime<Tz>> {
    let entry = order
        .package_histories
        .iter()
        .find(|h| h.status.as_deref() == Some(CREATED_STATUS))?;
    let millis = entry.created_date.filter(|ms| *ms != 0)?;
    from_epoch_millis(millis, tz)
}

/// One record per line item; orders without a creation time are dropped
pub fn flatten_orders(orders: &[RawOrder], tz: Tz) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for order in orders {
        let Some(created) = created_date(order, tz) else {
            dropped += 1;
            continue;
        };

        records.extend(order.lines.iter().map(|line| {
            let quantity = line.quantity();
            let price = line.price();
            FlatRecord {
                created_date: created,
                barcode: line.barcode.clone(),
                quantity,
                price,
                revenue: price * quantity as f64,
            }
        }));
    }

    if dropped > 0 {
        tracing::debug!("{} orders without \"Created\" history dropped", dropped);
    }

    records
}
