#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use places_gateway::apis::errors::UpstreamError;
use places_gateway::app::ports::{HttpClientPort, HttpGetRequest, HttpGetResult};

/// Canned upstream keyed by URL path suffix; records every request it sees.
/// Paths without a canned response behave like an unreachable host.
#[derive(Default)]
pub struct FakeHttp {
    responses: Mutex<HashMap<String, HttpGetResult>>,
    seen: Mutex<Vec<HttpGetRequest>>,
}

impl FakeHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn json(&self, path: &str, status: u16, body: Value) -> &Self {
        self.respond(path, status, body.to_string().into_bytes(), "application/json; charset=UTF-8")
    }

    pub fn respond(&self, path: &str, status: u16, bytes: Vec<u8>, content_type: &str) -> &Self {
        self.responses.lock().unwrap().insert(
            path.to_string(),
            HttpGetResult {
                status,
                bytes,
                content_type: content_type.to_string(),
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<HttpGetRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpGetRequest {
        self.requests().pop().expect("no request was made")
    }
}

#[async_trait]
impl HttpClientPort for FakeHttp {
    async fn get(&self, request: HttpGetRequest) -> Result<HttpGetResult, UpstreamError> {
        self.seen.lock().unwrap().push(request.clone());
        let responses = self.responses.lock().unwrap();
        responses
            .iter()
            .find(|(path, _)| request.url.ends_with(path.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(UpstreamError::connection_refused)
    }
}
