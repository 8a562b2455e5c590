//! Forwarding of video searches to the upstream provider.
//!
//! Requests are validated and rewritten as plain values. Only [`SearchProxy`]
//! touches the network or the API key.

use crate::{config::Config, AppError, Result};
use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;

/// The single route this proxy serves.
pub const SEARCH_PATH: &str = "/videos/search";

const USER_AGENT: &str = concat!("video-search-proxy/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
}

impl InboundRequest {
    pub fn new(method: Method, uri: &Uri) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
        }
    }

    /// Method is checked before path, so any non-GET request gets 405.
    pub fn validate(&self) -> Result<()> {
        if self.method != Method::GET {
            return Err(AppError::MethodNotAllowed);
        }
        if self.path != SEARCH_PATH {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// The query string is carried over untouched. An empty query adds no `?`.
    pub fn into_upstream(self, base_url: &str) -> UpstreamRequest {
        let url = match self.query.as_deref() {
            Some(query) if !query.is_empty() => format!("{}?{}", base_url, query),
            _ => base_url.to_string(),
        };
        UpstreamRequest { url }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: String,
}

/// An upstream reply whose body has not been read yet.
pub struct UpstreamResponse {
    inner: reqwest::Response,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let status = self.inner.status();
        let stream = self
            .inner
            .bytes_stream()
            .inspect_err(|e| tracing::warn!("Upstream body stream failed: {}", e));

        let mut response = Body::from_stream(stream).into_response();
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}

#[derive(Clone)]
pub struct SearchProxy {
    client: reqwest::Client,
    base_url: String,
    authorization: HeaderValue,
}

impl SearchProxy {
    pub fn new(config: &Config) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(config.pexels_api_key.expose())
            .map_err(|_| {
                AppError::Internal("PEXELS_API_KEY is not a valid header value".to_string())
            })?;
        authorization.set_sensitive(true);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.upstream_connect_timeout())
            .timeout(config.upstream_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.upstream_base_url.clone(),
            authorization,
        })
    }

    /// Validate, rewrite and forward one inbound request.
    pub async fn handle(&self, inbound: InboundRequest) -> Result<UpstreamResponse> {
        inbound.validate()?;
        let upstream = inbound.into_upstream(&self.base_url);
        self.forward(upstream).await
    }

    pub async fn forward(&self, upstream: UpstreamRequest) -> Result<UpstreamResponse> {
        tracing::debug!("Forwarding search to {}", upstream.url);

        let response = self
            .client
            .get(&upstream.url)
            .header(header::AUTHORIZATION, self.authorization.clone())
            .send()
            .await?;

        tracing::debug!("Upstream responded with {}", response.status());
        Ok(UpstreamResponse { inner: response })
    }
}
