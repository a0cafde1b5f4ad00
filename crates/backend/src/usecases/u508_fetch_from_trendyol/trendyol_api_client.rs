use async_trait::async_trait;
use contracts::enums::OrderStatus;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::FetchError;
use super::order_fetcher::OrderSource;
use super::range_splitter::DateRange;
use crate::shared::config::TrendyolConfig;
use crate::shared::resilience::{execute_with_retry, RetryPolicy};

/// HTTP-клиент для работы с Trendyol Seller Integration API
pub struct TrendyolApiClient {
    client: reqwest::Client,
    base_url: String,
    seller_id: String,
    api_key: String,
    api_secret: String,
    page_size: usize,
    retry: RetryPolicy,
}

impl TrendyolApiClient {
    pub fn new(config: &TrendyolConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            seller_id: config.seller_id.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            page_size: config.page_size,
            retry: RetryPolicy::new(config.max_retries, config.retry_base_delay_ms),
        })
    }

    fn orders_url(&self) -> String {
        format!(
            "{}/integration/order/sellers/{}/orders",
            self.base_url, self.seller_id
        )
    }

    /// Один запрос страницы GET /integration/order/sellers/{sellerId}/orders
    async fn fetch_page_once(
        &self,
        status: OrderStatus,
        range: &DateRange,
        page: u32,
    ) -> Result<OrdersPage, FetchError> {
        let url = self.orders_url();
        tracing::debug!(
            "Trendyol API: GET {} status={} range=[{}] page={}",
            url,
            status,
            range,
            page
        );

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .header("Accept", "application/json")
            .header("User-Agent", format!("{} - SelfIntegration", self.seller_id))
            .query(&[
                ("status", status.code().to_string()),
                ("startDate", range.start_millis().to_string()),
                ("endDate", range.end_millis().to_string()),
                ("orderByField", "PackageLastModifiedDate".to_string()),
                ("orderByDirection", "DESC".to_string()),
                ("size", self.page_size.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Transport { status, source })?;

        let http_status = response.status();
        if !http_status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(500).collect();
            tracing::error!(
                "Trendyol API request failed: status={} HTTP {} body={}",
                status,
                http_status,
                preview
            );
            return Err(FetchError::Status {
                status,
                code: http_status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport { status, source })?;

        serde_json::from_str::<OrdersPage>(&body).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            tracing::error!("Failed to parse Trendyol response: {}. Body: {}", e, preview);
            FetchError::Decode {
                status,
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl OrderSource for TrendyolApiClient {
    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn fetch_orders_page(
        &self,
        status: OrderStatus,
        range: &DateRange,
        page: u32,
    ) -> Result<Vec<RawOrder>, FetchError> {
        let orders_page = execute_with_retry(
            &self.retry,
            "trendyol_orders_page",
            FetchError::is_retryable,
            || self.fetch_page_once(status, range, page),
        )
        .await?;

        tracing::debug!(
            "Trendyol API: status={} page={} -> {} orders (totalElements={:?})",
            status,
            page,
            orders_page.content.len(),
            orders_page.total_elements
        );

        Ok(orders_page.content)
    }
}

/// Ответ GET /orders (одна страница)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<RawOrder>,
    #[serde(default)]
    pub total_elements: Option<i64>,
    #[serde(default)]
    pub total_pages: Option<i64>,
}

/// Отправление (package) из Trendyol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    #[serde(default, deserialize_with = "null_as_default")]
    pub package_histories: Vec<PackageHistory>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lines: Vec<LineItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageHistory {
    #[serde(default)]
    pub status: Option<String>,
    /// Epoch milliseconds, UTC
    #[serde(default)]
    pub created_date: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Trendyol sends barcodes as strings, older exports as numbers
    #[serde(default, deserialize_with = "barcode_as_string")]
    pub barcode: String,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl LineItem {
    pub fn quantity(&self) -> i64 {
        self.quantity.unwrap_or(0)
    }

    pub fn price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn barcode_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}
