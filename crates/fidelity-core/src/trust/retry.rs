//! Retry classification and backoff for trust service calls.

use crate::error::TrustError;
use std::time::Duration;

/// Whether a failed trust call is worth retrying.
///
/// Retryable: timeouts, rate limits (429), server errors (5xx) and
/// connection failures. Bad requests and malformed responses are not.
pub fn is_retryable(error: &TrustError) -> bool {
    match error {
        TrustError::Timeout { .. } => true,
        TrustError::Http {
            status_code,
            message,
        } => {
            if let Some(code) = status_code {
                return *code == 429 || (500..=599).contains(code);
            }
            message.contains("timed out") || message.contains("connect")
        }
        TrustError::InvalidResponse(_) | TrustError::InvalidRequest(_) => false,
    }
}

/// `base_delay * 2^attempt`, capped at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status_code: Option<u16>, message: &str) -> TrustError {
        TrustError::Http {
            message: message.to_string(),
            status_code,
        }
    }

    #[test]
    fn test_timeout_is_retryable() {
        assert!(is_retryable(&TrustError::Timeout { timeout_ms: 10_000 }));
    }

    #[test]
    fn test_status_classification() {
        assert!(is_retryable(&http(Some(429), "HTTP 429")));
        assert!(is_retryable(&http(Some(502), "HTTP 502")));
        assert!(!is_retryable(&http(Some(400), "HTTP 400")));
        assert!(!is_retryable(&http(Some(422), "HTTP 422")));
    }

    #[test]
    fn test_connection_error_retryable_without_status() {
        assert!(is_retryable(&http(None, "error trying to connect")));
        assert!(!is_retryable(&http(None, "builder error")));
    }

    #[test]
    fn test_contract_errors_not_retryable() {
        assert!(!is_retryable(&TrustError::InvalidResponse("bad json".into())));
        assert!(!is_retryable(&TrustError::InvalidRequest("bad rate".into())));
    }

    #[test]
    fn test_backoff_exponential_and_capped() {
        assert_eq!(backoff_duration(0, 500), Duration::from_millis(500));
        assert_eq!(backoff_duration(2, 500), Duration::from_millis(2000));
        assert_eq!(backoff_duration(12, 500), Duration::from_millis(30_000));
    }
}
