use serde::Serialize;
use serde_json::Value;

/// Provider failure reduced to the `{status, description}` pair clients see
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamError {
    pub status: String,
    pub description: String,
}

impl UpstreamError {
    pub fn new(status: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            description: description.into(),
        }
    }

    /// Error with the canned description for `code`
    pub fn from_code(code: &str) -> Self {
        Self::new(code, message_for_code(code))
    }

    /// No response at all reached us
    pub fn connection_refused() -> Self {
        Self::from_code("CONNECTION_REFUSED")
    }

    /// Build an error from whatever the upstream call left behind.
    ///
    /// Provider error codes in the body win over the HTTP status. Google puts
    /// its code in `status`, Yelp in `error.code`.
    pub fn from_parts(http_status: Option<u16>, body: Option<&Value>) -> Self {
        if http_status.is_none() && body.is_none() {
            return Self::connection_refused();
        }

        if let Some(body) = body {
            if let Some(code) = non_empty_str(body.get("status")) {
                let description = non_empty_str(body.get("error_message"))
                    .map(str::to_string)
                    .unwrap_or_else(|| message_for_code(code).to_string());
                return Self::new(code, description);
            }

            let yelp_error = body.get("error");
            if let Some(code) = non_empty_str(yelp_error.and_then(|e| e.get("code"))) {
                let description = non_empty_str(yelp_error.and_then(|e| e.get("description")))
                    .map(str::to_string)
                    .unwrap_or_else(|| message_for_code(code).to_string());
                return Self::new(code, description);
            }
        }

        let code = match http_status {
            Some(400) => "BAD_REQUEST",
            Some(403) => "FORBIDDEN",
            Some(404) => "NOT_FOUND",
            _ => "UNKNOWN_ERROR",
        };
        Self::from_code(code)
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Canned descriptions for codes that arrive without one
pub fn message_for_code(code: &str) -> &'static str {
    match code {
        "ZERO_RESULTS" => "The requested resource was found, but returned no results",
        "INVALID_REQUEST" => "The requested resource is invalid because of missing parameters",
        "BAD_REQUEST" => "The requested resource cannot be accessed",
        "FORBIDDEN" => "You do not have permission to access the requested resource",
        "NOT_FOUND" => "The requested resource could not be found",
        "CONNECTION_REFUSED" => "The requested resource cannot be reached due to a network issue",
        "UNKNOWN_ERROR" => "An unknown server error has occurred",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nothing_received_is_connection_refused() {
        let error = UpstreamError::from_parts(None, None);
        assert_eq!(error.status, "CONNECTION_REFUSED");
        assert_eq!(
            error.description,
            "The requested resource cannot be reached due to a network issue"
        );
    }

    #[test]
    fn google_status_with_and_without_message() {
        let error = UpstreamError::from_parts(
            Some(200),
            Some(&json!({ "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid." })),
        );
        assert_eq!(error, UpstreamError::new("REQUEST_DENIED", "The provided API key is invalid."));

        let error = UpstreamError::from_parts(Some(200), Some(&json!({ "status": "ZERO_RESULTS", "results": [] })));
        assert_eq!(
            error,
            UpstreamError::new("ZERO_RESULTS", "The requested resource was found, but returned no results")
        );
    }

    #[test]
    fn yelp_error_object() {
        let body = json!({ "error": { "code": "BUSINESS_NOT_FOUND", "description": "The requested business could not be found." } });
        let error = UpstreamError::from_parts(Some(404), Some(&body));
        assert_eq!(error.status, "BUSINESS_NOT_FOUND");
        assert_eq!(error.description, "The requested business could not be found.");

        let body = json!({ "error": { "code": "TOKEN_MISSING" } });
        let error = UpstreamError::from_parts(Some(400), Some(&body));
        assert_eq!(error, UpstreamError::new("TOKEN_MISSING", ""));
    }

    #[test]
    fn falls_back_to_http_status() {
        assert_eq!(UpstreamError::from_parts(Some(400), None).status, "BAD_REQUEST");
        assert_eq!(UpstreamError::from_parts(Some(403), Some(&json!("denied"))).status, "FORBIDDEN");
        assert_eq!(UpstreamError::from_parts(Some(404), None).status, "NOT_FOUND");
        assert_eq!(UpstreamError::from_parts(Some(502), None).status, "UNKNOWN_ERROR");
        assert_eq!(UpstreamError::from_parts(None, Some(&json!({}))).status, "UNKNOWN_ERROR");
    }
}
