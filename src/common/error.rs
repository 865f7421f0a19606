use thiserror::Error;

use crate::apis::errors::UpstreamError;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Request body failed validation or could not be parsed
    #[error("{0}")]
    Syntax(String),

    /// Request body was rejected outright
    #[error("{0}")]
    System(String),

    #[error("{}: {}", .0.status, .0.description)]
    Upstream(UpstreamError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn syntax(message: impl Into<String>) -> Self {
        GatewayError::Syntax(message.into())
    }

    /// Status code placed in the `info.status` field of a failed response
    pub fn status(&self) -> String {
        match self {
            GatewayError::Syntax(_) | GatewayError::Json(_) | GatewayError::Toml(_) => {
                "SYNTAX_ERROR".to_string()
            }
            GatewayError::Upstream(upstream) => upstream.status.clone(),
            GatewayError::Http(_) => "CONNECTION_REFUSED".to_string(),
            GatewayError::System(_) | GatewayError::Config(_) | GatewayError::Io(_) => {
                "SYSTEM_ERROR".to_string()
            }
        }
    }

    /// Human readable text placed in `info.description`
    pub fn description(&self) -> String {
        match self {
            GatewayError::Upstream(upstream) => upstream.description.clone(),
            other => other.to_string(),
        }
    }
}

impl From<UpstreamError> for GatewayError {
    fn from(error: UpstreamError) -> Self {
        GatewayError::Upstream(error)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_keep_their_message() {
        let error = GatewayError::syntax("The \"id\" key is empty or not a string");
        assert_eq!(error.status(), "SYNTAX_ERROR");
        assert_eq!(error.description(), "The \"id\" key is empty or not a string");
    }

    #[test]
    fn upstream_errors_pass_status_through() {
        let error: GatewayError = UpstreamError::new("ZERO_RESULTS", "nothing here").into();
        assert_eq!(error.status(), "ZERO_RESULTS");
        assert_eq!(error.description(), "nothing here");
    }

    #[test]
    fn malformed_json_reports_as_syntax_error() {
        let error: GatewayError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(error.status(), "SYNTAX_ERROR");
    }
}
