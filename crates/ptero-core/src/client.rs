//! Generic resource operations.
//!
//! Every endpoint of both scopes is one of five shapes: fetch one record,
//! fetch a paginated list, create, partially update, or fire an action.
//! [`PanelClient`] implements each shape once; the scope crates only supply
//! paths and payload types.

use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, Result};
use crate::pagination::{walk_pages, PAGE_QUERY_KEY};
use crate::query::QueryParams;
use crate::response::{decode, validate};
use crate::transport::{HttpTransport, Transport};
use crate::types::{FieldSubset, Record, RecordList, Scope};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Builder for [`PanelClient`].
pub struct PanelClientBuilder {
    credentials: Credentials,
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl PanelClientBuilder {
    /// Create a builder for the given scope, panel URL and API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL or key is empty or invalid.
    pub fn new(
        scope: Scope,
        panel_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            credentials: Credentials::new(scope, panel_url, api_key)?,
            config: ClientConfig::default(),
            transport: None,
        })
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.credentials = self.credentials.with_user_agent(user_agent);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Use the given transport instead of building an [`HttpTransport`].
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is out of range or
    /// the HTTP client cannot be built.
    pub fn build(self) -> Result<PanelClient> {
        self.config.check()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };

        Ok(PanelClient {
            credentials: Arc::new(self.credentials),
            transport,
            max_pages: self.config.max_pages,
        })
    }
}

/// Scope-bound client implementing the generic resource operations.
#[derive(Clone)]
pub struct PanelClient {
    credentials: Arc<Credentials>,
    transport: Arc<dyn Transport>,
    max_pages: u32,
}

impl PanelClient {
    /// Returns the credentials this client sends.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the credential scope.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.credentials.scope()
    }

    /// Fetch a single record.
    ///
    /// # Errors
    ///
    /// Returns transport, API or decode errors unchanged.
    pub async fn fetch_one<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let body = self.send(Method::GET, path, &[], None).await?;
        decode::<Record<R>>(body).map(Record::into_inner)
    }

    /// Fetch every record of a paginated list.
    ///
    /// The first page is requested with `query` as given; later pages add a
    /// `page` parameter.
    ///
    /// # Errors
    ///
    /// Returns the first transport, API, decode or pagination error; no
    /// partial list is returned.
    pub async fn fetch_list<R>(&self, path: &str, query: &QueryParams) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let first = self.fetch_page::<R>(path, query.as_pairs()).await?;
        walk_pages(first, self.max_pages, |page| {
            let pairs = query.with_replaced(PAGE_QUERY_KEY, page);
            async move { self.fetch_page::<R>(path, &pairs).await }
        })
        .await
    }

    /// Validate `payload`, then POST it and decode the created record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionFailed`] without sending anything if
    /// `payload` fails validation; otherwise transport, API or decode errors.
    pub async fn create<B, R>(&self, path: &str, payload: &B) -> Result<R>
    where
        B: Serialize + Validate,
        R: DeserializeOwned,
    {
        payload.validate()?;
        let body = to_body(payload)?;
        let body = self.send(Method::POST, path, &[], Some(body)).await?;
        decode::<Record<R>>(body).map(Record::into_inner)
    }

    /// PATCH the present fields of `fields` and decode the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionFailed`] without sending anything if no
    /// field is present; otherwise transport, API or decode errors.
    pub async fn update<B, R>(&self, path: &str, fields: &B) -> Result<R>
    where
        B: FieldSubset,
        R: DeserializeOwned,
    {
        if fields.is_empty() {
            return Err(Error::PreconditionFailed(format!(
                "no {} fields specified",
                B::KIND
            )));
        }
        let body = to_body(fields)?;
        let body = self.send(Method::PATCH, path, &[], Some(body)).await?;
        decode::<Record<R>>(body).map(Record::into_inner)
    }

    /// Send a request whose response body, if any, is discarded.
    ///
    /// # Errors
    ///
    /// Returns transport or API errors unchanged.
    pub async fn action<B>(&self, method: Method, path: &str, payload: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = payload.map(to_body).transpose()?;
        self.send(method, path, &[], body).await.map(|_| ())
    }

    async fn fetch_page<R>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<RecordList<R>>
    where
        R: DeserializeOwned,
    {
        let body = self.send(Method::GET, path, query, None).await?;
        decode(body)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<Option<Vec<u8>>> {
        let request = self.credentials.build_request(method, path, query, body)?;
        info!(
            scope = %self.scope(),
            method = %request.method,
            path = %path,
            "Sending panel request"
        );
        let response = self.transport.execute(request).await?;
        debug!(status = response.status.as_u16(), "validating panel response");
        validate(response)
    }
}

fn to_body<B>(payload: &B) -> Result<Vec<u8>>
where
    B: Serialize + ?Sized,
{
    serde_json::to_vec(payload)
        .map_err(|err| Error::InvalidRequest(format!("Failed to serialize payload: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{PanelRequest, PanelResponse};
    use async_trait::async_trait;
    use mockall::mock;
    use reqwest::StatusCode;
    use serde::Deserialize;
    use serde_json::json;
    use validator::ValidationError;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    mock! {
        pub Transport {}

        #[async_trait]
        impl Transport for Transport {
            async fn execute(&self, request: PanelRequest) -> Result<PanelResponse>;
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        id: u64,
        name: String,
    }

    #[derive(Serialize, Default)]
    struct WidgetPatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    }

    impl FieldSubset for WidgetPatch {
        const KIND: &'static str = "widget";

        fn is_empty(&self) -> bool {
            self.name.is_none()
        }
    }

    #[derive(Serialize, Validate)]
    #[validate(schema(function = "validate_widget"))]
    struct NewWidget {
        name: Option<String>,
    }

    fn validate_widget(widget: &NewWidget) -> std::result::Result<(), ValidationError> {
        if widget.name.is_none() {
            return Err(ValidationError::new("name_required"));
        }
        Ok(())
    }

    fn mock_client(transport: MockTransport) -> PanelClient {
        PanelClientBuilder::new(Scope::Application, "https://panel.example.com", "ptla_key")
            .unwrap()
            .with_transport(Arc::new(transport))
            .build()
            .unwrap()
    }

    fn wiremock_client(server: &MockServer) -> PanelClient {
        PanelClientBuilder::new(Scope::Application, server.uri(), "ptla_key")
            .unwrap()
            .with_user_agent("ptero-test/0.1.0")
            .build()
            .unwrap()
    }

    fn widget_page(ids: &[u64], current_page: u32, total_pages: u32) -> serde_json::Value {
        let data: Vec<_> = ids
            .iter()
            .map(|id| json!({"object": "widget", "attributes": {"id": id, "name": format!("w{id}")}}))
            .collect();
        json!({
            "object": "list",
            "data": data,
            "meta": {"pagination": {
                "total": 5, "count": ids.len(), "per_page": 2,
                "current_page": current_page, "total_pages": total_pages, "links": {}
            }}
        })
    }

    #[test]
    fn builder_rejects_empty_credentials() {
        assert!(PanelClientBuilder::new(Scope::Application, "", "key").is_err());
        assert!(PanelClientBuilder::new(Scope::Application, "https://p.example", "").is_err());
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = PanelClientBuilder::new(Scope::Client, "https://p.example", "key")
            .unwrap()
            .with_config(ClientConfig::new().with_max_pages(0))
            .build();
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[tokio::test]
    async fn update_with_no_fields_never_calls_transport() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(0);

        let client = mock_client(transport);
        let err = client
            .update::<_, Widget>("/widgets/1", &WidgetPatch::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            Error::PreconditionFailed("no widget fields specified".to_string())
        );
    }

    #[tokio::test]
    async fn create_failing_validation_never_calls_transport() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(0);

        let client = mock_client(transport);
        let err = client
            .create::<_, Widget>("/widgets", &NewWidget { name: None })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PreconditionFailed(_)));
        assert!(err.is_local());
    }

    #[tokio::test]
    async fn fetch_one_goes_through_transport() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|request| {
                request.method == Method::GET
                    && request.url.as_str() == "https://panel.example.com/api/application/widgets/3"
            })
            .times(1)
            .returning(|_| {
                Ok(PanelResponse::new(
                    StatusCode::OK,
                    r#"{"object":"widget","attributes":{"id":3,"name":"gear"}}"#,
                ))
            });

        let client = mock_client(transport);
        let widget: Widget = client.fetch_one("/widgets/3").await.unwrap();
        assert_eq!(
            widget,
            Widget {
                id: 3,
                name: "gear".to_string()
            }
        );
    }

    #[tokio::test]
    async fn transport_errors_surface_unchanged() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Err(Error::ServiceUnavailable("connection refused".to_string())));

        let client = mock_client(transport);
        let err = client.fetch_one::<Widget>("/widgets/3").await.unwrap_err();
        assert_eq!(
            err,
            Error::ServiceUnavailable("connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn fetch_one_no_content_is_decode_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| Ok(PanelResponse::new(StatusCode::NO_CONTENT, Vec::new())));

        let client = mock_client(transport);
        let err = client.fetch_one::<Widget>("/widgets/3").await.unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[tokio::test]
    async fn fetch_list_walks_all_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/application/widgets"))
            .and(header("Authorization", "Bearer ptla_key"))
            .and(header("User-Agent", "ptero-test/0.1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(widget_page(&[1, 2], 1, 3)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/application/widgets"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(widget_page(&[3, 4], 2, 3)))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/application/widgets"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(widget_page(&[5], 3, 3)))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        let client = wiremock_client(&server);
        let widgets: Vec<Widget> = client
            .fetch_list("/widgets", &QueryParams::new())
            .await
            .unwrap();

        let ids: Vec<u64> = widgets.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn fetch_list_single_page_makes_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/application/widgets"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(widget_page(&[1], 1, 1)))
            .expect(1)
            .mount(&server)
            .await;

        let mut query = QueryParams::new();
        query.push("per_page", 100);

        let client = wiremock_client(&server);
        let widgets: Vec<Widget> = client.fetch_list("/widgets", &query).await.unwrap();
        assert_eq!(widgets.len(), 1);
    }

    #[tokio::test]
    async fn fetch_list_error_on_later_page_discards_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/application/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(widget_page(&[1, 2], 1, 2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/application/widgets"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "errors": [{"code": "HttpException", "status": "500", "detail": "An unexpected error was encountered while processing this request."}]
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        let client = wiremock_client(&server);
        let err = client
            .fetch_list::<Widget>("/widgets", &QueryParams::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn update_sends_only_present_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/application/widgets/1"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"name": "sprocket"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "widget",
                "attributes": {"id": 1, "name": "sprocket"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = wiremock_client(&server);
        let widget: Widget = client
            .update(
                "/widgets/1",
                &WidgetPatch {
                    name: Some("sprocket".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(widget.name, "sprocket");
    }

    #[tokio::test]
    async fn action_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/application/widgets/1/suspend"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = wiremock_client(&server);
        client
            .action::<()>(Method::POST, "/widgets/1/suspend", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn action_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/application/widgets/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errors": [{"code": "NotFoundHttpException", "status": "404", "detail": "The requested resource could not be found on the server."}]
            })))
            .mount(&server)
            .await;

        let client = wiremock_client(&server);
        let err = client
            .action::<()>(Method::DELETE, "/widgets/9", None)
            .await
            .unwrap_err();
        assert!(err.panel_errors().unwrap().has_code("NotFoundHttpException"));
    }
}
