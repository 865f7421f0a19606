use crate::app::ports::{HttpClientPort, HttpGetRequest, HttpGetResult};
use crate::apis::errors::UpstreamError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::warn;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration) -> crate::common::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, request: HttpGetRequest) -> Result<HttpGetResult, UpstreamError> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        // A single attempt; anything short of a response is a refused connection.
        let resp = builder.send().await.map_err(|e| {
            warn!(url = %request.url, error = %e, "upstream request failed");
            UpstreamError::connection_refused()
        })?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| {
                warn!(url = %request.url, error = %e, "upstream body could not be read");
                UpstreamError::connection_refused()
            })?
            .to_vec();

        Ok(HttpGetResult { status, bytes, content_type })
    }
}
