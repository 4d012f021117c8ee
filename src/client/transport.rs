//! Network transport seam.
//!
//! The client never performs I/O itself: it hands a resolved
//! [`TransportRequest`] to a [`Transport`]. [`ReqwestTransport`] is the
//! production implementation; tests substitute their own.

use std::future::Future;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::cache::Headers;
use crate::client::HttpResponse;
use crate::error::{ClientError, Result};
use crate::policy::RequestHeaders;

/// A request with its method normalized and URL fully resolved.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: String,
    pub url: String,
    pub headers: RequestHeaders,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

/// Performs the network exchange for a request.
pub trait Transport: Send + Sync {
    fn send(&self, request: TransportRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

// == Reqwest Transport ==
/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a preconfigured client (proxies, TLS, default headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<HttpResponse> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| ClientError::InvalidMethod(request.method.clone()))?;

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status_code = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse::new(status_code, headers, body))
    }
}

/// Groups repeated header values under their lowercase name.
fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_TYPE, SET_COOKIE};

    #[test]
    fn test_collect_headers_groups_values() {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        map.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        map.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let headers = collect_headers(&map);

        assert_eq!(headers["content-type"], vec!["application/json"]);
        assert_eq!(headers["set-cookie"], vec!["a=1", "b=2"]);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new();
        let request = TransportRequest {
            method: "GET".to_string(),
            url: "http://127.0.0.1:1/".to_string(),
            headers: RequestHeaders::new(),
            body: None,
            timeout: Some(Duration::from_secs(2)),
        };

        let result = transport.send(request).await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }
}
