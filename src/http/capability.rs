use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use crate::error::TransportError;

/// Description of one request a scenario step wants issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestSpec {
    /// Name reported on the outcome event, e.g. the endpoint name.
    pub label: Arc<str>,
    pub method: Method,
    /// Path relative to the target, or an absolute URL.
    pub path: String,
    pub body: Option<Arc<str>>,
}

impl RequestSpec {
    #[must_use]
    pub fn new(label: impl Into<Arc<str>>, method: Method, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            method,
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        let path = path.into();
        let label: Arc<str> = Arc::from(path.as_str());
        Self::new(label, Method::GET, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Arc<str>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body_bytes: u64,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Executes one request and reports its status and payload size.
///
/// Latency is measured by the caller around `execute`.
///
/// Implementations are shared by every virtual user of a run.
#[async_trait]
pub trait HttpCapability: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no HTTP response could be obtained
    /// (timeout, connection failure, unreadable body).
    async fn execute(&self, request: &RequestSpec) -> Result<HttpResponse, TransportError>;
}

