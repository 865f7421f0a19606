use async_trait::async_trait;

use crate::apis::errors::UpstreamError;

/// Outbound GET as the provider adapters describe it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HttpGetRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer_token: Option<String>,
}

impl HttpGetRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Value of a query parameter, first occurrence
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Any way of performing one GET. Fails only when no response arrived.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, request: HttpGetRequest) -> Result<HttpGetResult, UpstreamError>;
}
