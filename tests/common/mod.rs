#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use hcp_auth::{Context, Error, HttpSend, Result};
use std::sync::{Arc, Mutex};

/// A request captured by [`MockHttpSend`], with the body it carried.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: http::Method,
    pub uri: String,
    pub headers: http::HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body must be JSON")
    }
}

/// MockHttpSend replays a canned response and records every request it sees.
#[derive(Debug, Clone)]
pub struct MockHttpSend {
    status: u16,
    body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpSend {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push(RecordedRequest {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });

        Ok(http::Response::builder()
            .status(self.status)
            .body(Bytes::from(self.body.clone()))
            .expect("response must build"))
    }
}

/// FailingHttpSend simulates a transport-level failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingHttpSend;

#[async_trait]
impl HttpSend for FailingHttpSend {
    async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected("connection reset by peer"))
    }
}

/// Context wired to a mock transport.
pub fn mock_context(mock: &MockHttpSend) -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new().with_http_send(mock.clone())
}

/// Context wired to the real file system for credential file tests.
#[cfg(not(target_arch = "wasm32"))]
pub fn fs_context() -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new().with_file_write(hcp_auth::DefaultContext::new())
}
