use contracts::enums::OrderStatus;
use thiserror::Error;

/// Ошибки загрузки заказов из Trendyol
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-success HTTP status for a page
    #[error("Trendyol API error ({status}): HTTP {code}")]
    Status { status: OrderStatus, code: u16 },

    /// Network failure or timeout
    #[error("Trendyol request failed ({status}): {source}")]
    Transport {
        status: OrderStatus,
        #[source]
        source: reqwest::Error,
    },

    /// Body is not a valid orders page
    #[error("Failed to decode Trendyol response ({status}): {message}")]
    Decode { status: OrderStatus, message: String },
}

impl FetchError {
    pub fn status(&self) -> OrderStatus {
        match self {
            FetchError::Status { status, .. }
            | FetchError::Transport { status, .. }
            | FetchError::Decode { status, .. } => *status,
        }
    }

    /// Timeouts, connection failures, rate limiting and 5xx are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { code, .. } => *code == 429 || (500..600).contains(code),
            FetchError::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            FetchError::Decode { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_names_status_and_code() {
        let err = FetchError::Status {
            status: OrderStatus::Shipped,
            code: 401,
        };
        assert_eq!(err.to_string(), "Trendyol API error (Shipped): HTTP 401");
        assert_eq!(err.status(), OrderStatus::Shipped);
    }

    #[test]
    fn test_retryable_statuses() {
        let status = |code| FetchError::Status {
            status: OrderStatus::Created,
            code,
        };
        assert!(status(429).is_retryable());
        assert!(status(503).is_retryable());
        assert!(!status(400).is_retryable());
        assert!(!status(401).is_retryable());
        assert!(!FetchError::Decode {
            status: OrderStatus::Created,
            message: "bad json".into()
        }
        .is_retryable());
    }
}
