//! HTTP transport seam.
//!
//! Requests and responses cross this boundary as plain data. The client owns
//! its transport explicitly, so tests can swap in a fake without a network.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use tracing::{debug, warn};
use url::Url;

/// A fully addressed, authenticated request.
#[derive(Debug, Clone)]
pub struct PanelRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including query string
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Serialized JSON body
    pub body: Option<Vec<u8>>,
}

/// A response whose body has been read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl PanelResponse {
    /// Create a response from a status and body.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues [`PanelRequest`]s.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the whole response body.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request could not be sent or the body
    /// could not be read. Non-success status codes are not errors here.
    async fn execute(&self, request: PanelRequest) -> Result<PanelResponse>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Build a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new();

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        if !config.tls_verify {
            warn!("TLS verification disabled for panel client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub const fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: PanelRequest) -> Result<PanelResponse> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        // Consuming the body releases the connection, including on read errors.
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "received panel response");

        Ok(PanelResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn execute_sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/client/servers/1a7ce997/command"))
            .and(header("Accept", "application/json"))
            .and(body_string(r#"{"command":"say hi"}"#))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let request = PanelRequest {
            method: Method::POST,
            url: Url::parse(&format!(
                "{}/api/client/servers/1a7ce997/command",
                server.uri()
            ))
            .unwrap(),
            headers,
            body: Some(br#"{"command":"say hi"}"#.to_vec()),
        };

        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let response = transport.execute(request).await.unwrap();
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn execute_returns_error_statuses_as_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let request = PanelRequest {
            method: Method::GET,
            url: Url::parse(&server.uri()).unwrap(),
            headers: HeaderMap::new(),
            body: None,
        };

        let transport = HttpTransport::from_client(Client::new());
        let response = transport.execute(request).await.unwrap();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, b"oops".to_vec());
    }

    #[tokio::test]
    async fn execute_connection_refused_is_transport_error() {
        let request = PanelRequest {
            method: Method::GET,
            url: Url::parse("http://127.0.0.1:9/api/application/servers").unwrap(),
            headers: HeaderMap::new(),
            body: None,
        };

        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let err = transport.execute(request).await.unwrap_err();
        assert!(!err.is_local());
        assert!(err.status().is_none());
    }
}
