pub mod stats;

pub use stats::FetchStats;

use crate::usecases::common::UseCaseMetadata;

/// Загрузка отправлений из Trendyol за период
pub struct FetchFromTrendyol;

impl UseCaseMetadata for FetchFromTrendyol {
    fn usecase_index() -> &'static str {
        "u508"
    }

    fn usecase_name() -> &'static str {
        "fetch_from_trendyol"
    }

    fn display_name() -> &'static str {
        "Загрузка заказов из Trendyol"
    }

    fn description() -> &'static str {
        "Pages through the seller orders endpoint for every status and date range"
    }
}
