use super::flattener::FlatRecord;
use crate::usecases::u508_fetch_from_trendyol::DateRange;

/// Keep records created inside the requested period (both ends inclusive)
pub fn filter_window(records: Vec<FlatRecord>, window: &DateRange) -> Vec<FlatRecord> {
    let before = records.len();
    let kept: Vec<FlatRecord> = records
        .into_iter()
        .filter(|r| window.contains(&r.created_date))
        .collect();

    tracing::debug!(
        "Window [{}]: {} of {} records kept",
        window,
        kept.len(),
        before
    );
    kept
}
