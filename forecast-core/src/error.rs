use reqwest::StatusCode;
use thiserror::Error;

/// Failure of any stage of the forecast pipeline.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Input rejected at the boundary, before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("Failed to fetch {endpoint} weather: {cause}")]
    Fetch {
        endpoint: &'static str,
        #[source]
        cause: FetchCause,
    },

    #[error("Malformed {endpoint} response from weather provider: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },

    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// Underlying reason a provider request did not produce a usable body.
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ForecastError {
    pub fn missing_city() -> Self {
        Self::Validation("City name is required".to_string())
    }

    pub(crate) fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse { endpoint, reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_city_message_is_user_facing() {
        assert_eq!(ForecastError::missing_city().to_string(), "City name is required");
    }

    #[test]
    fn status_failure_names_endpoint_and_message() {
        let err = ForecastError::Fetch {
            endpoint: "current",
            cause: FetchCause::Status {
                status: StatusCode::NOT_FOUND,
                message: "city not found".to_string(),
            },
        };

        let msg = err.to_string();
        assert!(msg.contains("current"));
        assert!(msg.contains("city not found"));
    }
}
