use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, redirect};
use tracing::debug;
use url::Url;

use crate::error::{HttpError, TransportError};

use super::{HttpCapability, HttpResponse, RequestSpec};

pub const DEFAULT_USER_AGENT: &str = concat!("volley-loadtest/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
    pub redirect_limit: usize,
}

impl HttpClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: Some(DEFAULT_USER_AGENT.to_owned()),
            redirect_limit: 10,
        }
    }
}

/// [`HttpCapability`] backed by a pooled `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestCapability {
    client: Client,
    base: Url,
}

impl ReqwestCapability {
    /// Builds the client and validates the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the client cannot be
    /// constructed.
    pub fn new(config: &HttpClientConfig) -> Result<Self, HttpError> {
        let base = Url::parse(&config.base_url).map_err(|err| HttpError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source: err,
        })?;
        if base.cannot_be_a_base() {
            return Err(HttpError::BaseUrlCannotBeABase {
                url: config.base_url.clone(),
            });
        }

        let mut builder = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout);
        if let Some(agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(agent);
        }
        builder = if config.redirect_limit == 0 {
            builder.redirect(redirect::Policy::none())
        } else {
            builder.redirect(redirect::Policy::limited(config.redirect_limit))
        };

        let client = builder
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;
        Ok(Self { client, base })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl HttpCapability for ReqwestCapability {
    async fn execute(&self, request: &RequestSpec) -> Result<HttpResponse, TransportError> {
        let url = resolve_url(&self.base, &request.path)?;
        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(body) = request.body.as_deref() {
            builder = builder.body(body.to_owned());
        }

        let response = builder.send().await.map_err(|err| {
            debug!("Request '{}' failed: {}", request.label, err);
            TransportError::from(err)
        })?;
        let status = response.status().as_u16();
        let body_bytes = drain_response_body(response).await?;

        Ok(HttpResponse {
            status,
            body_bytes,
        })
    }
}

/// Joins a step path onto the base URL.
///
/// Absolute URLs are used as-is; anything else is appended to the base so
/// that a base of `http://host/api` and a path of `/users` targets
/// `http://host/api/users`.
pub(super) fn resolve_url(base: &Url, path: &str) -> Result<Url, TransportError> {
    if path.starts_with("http://") || path.starts_with("https://") {
        return Url::parse(path).map_err(|err| TransportError::InvalidPath {
            path: path.to_owned(),
            message: err.to_string(),
        });
    }

    let root = base.as_str().trim_end_matches('/');
    let joined = if path.is_empty() {
        format!("{}/", root)
    } else if path.starts_with('/') {
        format!("{}{}", root, path)
    } else {
        format!("{}/{}", root, path)
    };
    Url::parse(&joined).map_err(|err| TransportError::InvalidPath {
        path: path.to_owned(),
        message: err.to_string(),
    })
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, TransportError> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
