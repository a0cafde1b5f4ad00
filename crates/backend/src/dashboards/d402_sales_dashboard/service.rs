use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use contracts::dashboards::d402_sales_dashboard::{
    DashboardOutcome, EmptyReason, SalesDashboardRequest, SalesDashboardResponse,
};

use super::aggregator::aggregate;
use super::catalog_joiner::join_catalog;
use super::error::DashboardError;
use super::flattener::flatten_orders;
use super::window_filter::filter_window;
use crate::projections::p909_product_catalog::{service as catalog_service, ProductCatalog};
use crate::shared::config::get_config;
use crate::shared::format::{format_amount, format_number};
use crate::usecases::u508_fetch_from_trendyol::{
    fetch_all, DateRange, OrderSource, RangeSplitter, TrendyolApiClient,
};

/// Build the dashboard for a period using the process configuration.
///
/// The catalog is loaded (and credentials checked) before the marketplace is contacted.
pub async fn build_sales_dashboard(
    request: SalesDashboardRequest,
) -> Result<SalesDashboardResponse, DashboardError> {
    validate_request(&request)?;

    let config = get_config()?;
    let tz = config.window.tz()?;

    let catalog = catalog_service::get_catalog(&config.catalog).await?;

    config.trendyol.ensure_credentials()?;
    let client = TrendyolApiClient::new(&config.trendyol)?;
    let splitter = RangeSplitter::new(
        tz,
        config.window.trailing_window_days,
        config.window.chunk_days,
    );

    build_sales_dashboard_at(
        &client,
        &catalog,
        &splitter,
        Utc::now().with_timezone(&tz),
        &request,
    )
    .await
}

/// Full pipeline against any order source with an explicit `now`
pub async fn build_sales_dashboard_at<S>(
    source: &S,
    catalog: &ProductCatalog,
    splitter: &RangeSplitter,
    now: DateTime<Tz>,
    request: &SalesDashboardRequest,
) -> Result<SalesDashboardResponse, DashboardError>
where
    S: OrderSource + ?Sized,
{
    validate_request(request)?;
    let tz = splitter.tz();

    let ranges = splitter.split_at(now, request.date_from, request.date_to);
    let statuses = request.status.statuses();
    tracing::info!(
        "D402: period {}..{} status={} -> {} ranges x {} statuses",
        request.date_from,
        request.date_to,
        request.status,
        ranges.len(),
        statuses.len()
    );

    let fetched = fetch_all(source, &statuses, &ranges).await?;
    tracing::info!(
        "D402: fetched {} orders ({} pages, {} requests)",
        fetched.orders.len(),
        fetched.stats.pages,
        fetched.stats.pairs
    );

    let respond = |outcome: DashboardOutcome| SalesDashboardResponse {
        date_from: request.date_from,
        date_to: request.date_to,
        status: request.status,
        fetch: fetched.stats,
        outcome,
    };

    if fetched.orders.is_empty() {
        tracing::info!("D402: no orders returned");
        return Ok(respond(DashboardOutcome::empty(EmptyReason::NoOrders)));
    }

    let records = flatten_orders(&fetched.orders, tz);
    tracing::info!("D402: {} line records after flattening", records.len());
    if records.is_empty() {
        return Ok(respond(DashboardOutcome::empty(
            EmptyReason::NoCreatedHistory,
        )));
    }

    let window = DateRange::for_days(request.date_from, request.date_to, tz).ok_or(
        DashboardError::InvalidRange {
            from: request.date_from,
            to: request.date_to,
        },
    )?;
    let records = filter_window(records, &window);
    tracing::info!("D402: {} records inside the period", records.len());
    if records.is_empty() {
        return Ok(respond(DashboardOutcome::empty(EmptyReason::OutsideWindow)));
    }

    let enriched = join_catalog(&records, catalog);
    let dashboard = aggregate(&enriched);

    tracing::info!(
        "D402: revenue {} TL, quantity {}, {} products",
        format_amount(dashboard.summary.total_revenue),
        format_number(dashboard.summary.total_quantity),
        dashboard.summary.product_count
    );

    Ok(respond(DashboardOutcome::Ready(dashboard)))
}

fn validate_request(request: &SalesDashboardRequest) -> Result<(), DashboardError> {
    if request.is_valid_range() {
        Ok(())
    } else {
        Err(DashboardError::InvalidRange {
            from: request.date_from,
            to: request.date_to,
        })
    }
}
