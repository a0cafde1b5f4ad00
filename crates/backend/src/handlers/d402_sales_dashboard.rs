use axum::{extract::Query, http::StatusCode, Json};
use contracts::dashboards::d402_sales_dashboard::{SalesDashboardRequest, SalesDashboardResponse};
use tracing::Instrument;
use uuid::Uuid;

use crate::dashboards::d402_sales_dashboard::{service, DashboardError};

/// GET /api/d402/sales_dashboard?date_from=2025-01-01&date_to=2025-01-31&status=All
pub async fn get_sales_dashboard(
    Query(request): Query<SalesDashboardRequest>,
) -> Result<Json<SalesDashboardResponse>, (StatusCode, String)> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("d402", %run_id);

    async move {
        tracing::info!(
            "D402 Dashboard: {}..{} status={}",
            request.date_from,
            request.date_to,
            request.status
        );

        match service::build_sales_dashboard(request).await {
            Ok(response) => {
                match response.outcome.as_ready() {
                    Some(dashboard) => tracing::info!(
                        "D402 Dashboard: returning {} products",
                        dashboard.products.len()
                    ),
                    None => tracing::info!("D402 Dashboard: no data for the period"),
                }
                Ok(Json(response))
            }
            Err(e) => {
                let status = status_for(&e);
                tracing::error!("D402 Dashboard: failed ({}): {}", status.as_u16(), e);
                Err((status, e.to_string()))
            }
        }
    }
    .instrument(span)
    .await
}

/// HTTP status of a failed dashboard run
pub fn status_for(error: &DashboardError) -> StatusCode {
    match error {
        DashboardError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
        DashboardError::Fetch(_) => StatusCode::BAD_GATEWAY,
        DashboardError::Catalog(_) | DashboardError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
