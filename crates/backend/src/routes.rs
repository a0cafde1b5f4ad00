use axum::{routing::get, Router};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // D402 Sales Dashboard (Trendyol)
        .route(
            "/api/d402/sales_dashboard",
            get(handlers::d402_sales_dashboard::get_sales_dashboard),
        )
}
