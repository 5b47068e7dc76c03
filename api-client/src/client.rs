use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::path::PathParams;
use crate::response::ApiResponse;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;
use url::Url;

/// Text attached in place of a file that does not exist or cannot be opened
pub const FILE_NOT_AVAILABLE: &str = "FILE_NOT_AVAILABLE";

/// Header carrying the configured API key
const API_KEY_HEADER: &str = "api_key";

/// Value of one multipart field before the form is assembled
#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    /// Field is left out of the form
    Null,
    Text(String),
    File(PathBuf),
    /// Any other value, sent in its JSON text form
    Value(Value),
}

impl From<&str> for PartValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for PartValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<T: Into<PartValue>> From<Option<T>> for PartValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Multipart field as it will be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedPart {
    Text { name: String, value: String },
    File { name: String, file_name: String, bytes: Vec<u8> },
}

impl PlannedPart {
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Text value, `None` for attached files
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { value, .. } => Some(value),
            Self::File { .. } => None,
        }
    }
}

/// Decide what each multipart field turns into.
///
/// Null fields are skipped. A file that does not exist becomes the
/// [`FILE_NOT_AVAILABLE`] text; one that exists but cannot be read becomes
/// `Error loading file: {name}`. Field order is preserved.
pub async fn plan_multipart(fields: Vec<(String, PartValue)>) -> Vec<PlannedPart> {
    let mut planned = Vec::with_capacity(fields.len());

    for (name, value) in fields {
        let part = match value {
            PartValue::Null => continue,
            PartValue::Value(Value::Null) => continue,
            PartValue::Text(value) => PlannedPart::Text { name, value },
            PartValue::Value(Value::String(value)) => PlannedPart::Text { name, value },
            PartValue::Value(other) => PlannedPart::Text {
                name,
                value: other.to_string(),
            },
            PartValue::File(path) => plan_file(name, &path).await,
        };
        planned.push(part);
    }

    planned
}

async fn plan_file(name: String, path: &Path) -> PlannedPart {
    let file_name = path
        .file_name()
        .map(|file_name| file_name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if tokio::fs::metadata(path).await.is_err() {
        tracing::warn!(field = %name, path = %path.display(), "multipart file not available");
        return PlannedPart::Text {
            name,
            value: FILE_NOT_AVAILABLE.to_string(),
        };
    }

    match tokio::fs::read(path).await {
        Ok(bytes) => PlannedPart::File {
            name,
            file_name,
            bytes,
        },
        Err(error) => {
            tracing::warn!(
                field = %name,
                path = %path.display(),
                error = %error,
                "multipart file unreadable"
            );
            PlannedPart::Text {
                name,
                value: format!("Error loading file: {file_name}"),
            }
        }
    }
}

fn assemble_form(parts: Vec<PlannedPart>) -> Form {
    parts.into_iter().fold(Form::new(), |form, part| match part {
        PlannedPart::Text { name, value } => form.text(name, value),
        PlannedPart::File {
            name,
            file_name,
            bytes,
        } => form.part(name, Part::bytes(bytes).file_name(file_name)),
    })
}

/// HTTP client bound to one service base address.
///
/// Requests default to a JSON content type and carry the configured API key.
/// Nothing is retried, and error statuses come back as ordinary responses.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_uri: String,
    auth_headers: HeaderMap,
}

impl ApiClient {
    /// Create a new API client with configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        let mut auth_headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(api_key)
                .map_err(|e| ApiError::invalid_header(API_KEY_HEADER.to_string(), e.to_string()))?;
            auth_headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        Ok(Self {
            client,
            base_uri: config.base_uri.trim_end_matches('/').to_string(),
            auth_headers,
        })
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Absolute URL for a path template
    pub fn url(&self, path: &str, params: &PathParams) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_uri, params.substitute(path)))?)
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.get_with(path, &PathParams::new()).await
    }

    pub async fn get_with(&self, path: &str, params: &PathParams) -> Result<ApiResponse> {
        let request = self.json_request(Method::GET, path, params)?;
        self.execute(request).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.post_with(path, body, &PathParams::new()).await
    }

    pub async fn post_with<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        params: &PathParams,
    ) -> Result<ApiResponse> {
        let request = self.json_request(Method::POST, path, params)?.json(body);
        self.execute(request).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.put_with(path, body, &PathParams::new()).await
    }

    pub async fn put_with<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        params: &PathParams,
    ) -> Result<ApiResponse> {
        let request = self.json_request(Method::PUT, path, params)?.json(body);
        self.execute(request).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.delete_with(path, &PathParams::new()).await
    }

    pub async fn delete_with(&self, path: &str, params: &PathParams) -> Result<ApiResponse> {
        let request = self.json_request(Method::DELETE, path, params)?;
        self.execute(request).await
    }

    /// DELETE without the API key header
    pub async fn delete_unauthenticated(
        &self,
        path: &str,
        params: &PathParams,
    ) -> Result<ApiResponse> {
        let request = self
            .client
            .request(Method::DELETE, self.url(path, params)?)
            .header(CONTENT_TYPE, "application/json");
        self.execute(request).await
    }

    /// POST `application/x-www-form-urlencoded` fields
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
        params: &PathParams,
    ) -> Result<ApiResponse> {
        let request = self.request(Method::POST, path, params)?.form(form);
        self.execute(request).await
    }

    /// POST `multipart/form-data`, planned with [`plan_multipart`]
    pub async fn post_multipart(
        &self,
        path: &str,
        fields: Vec<(String, PartValue)>,
        params: &PathParams,
    ) -> Result<ApiResponse> {
        let parts = plan_multipart(fields).await;
        let request = self
            .request(Method::POST, path, params)?
            .multipart(assemble_form(parts));
        self.execute(request).await
    }

    /// Authenticated request without a body encoding
    fn request(&self, method: Method, path: &str, params: &PathParams) -> Result<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.url(path, params)?)
            .headers(self.auth_headers.clone()))
    }

    fn json_request(
        &self,
        method: Method,
        path: &str,
        params: &PathParams,
    ) -> Result<RequestBuilder> {
        Ok(self
            .request(method, path, params)?
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json"))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        let started = Instant::now();

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::debug!(%method, %url, error = %e, "request failed");
            ApiError::Transport(e)
        })?;
        let response = ApiResponse::read(response).await?;

        tracing::debug!(
            %method,
            %url,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, body_string, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig::new(server.uri()).with_api_key("special-key")).unwrap()
    }

    #[tokio::test]
    async fn test_plan_skips_null_and_keeps_order() {
        let planned = plan_multipart(vec![
            ("skipped".to_string(), PartValue::Null),
            ("additionalMetadata".to_string(), "front view".into()),
            ("also_skipped".to_string(), PartValue::Value(Value::Null)),
            ("count".to_string(), PartValue::Value(json!(3))),
            ("label".to_string(), PartValue::Value(json!("plain"))),
        ])
        .await;

        let names: Vec<_> = planned.iter().map(PlannedPart::name).collect();
        assert_eq!(names, vec!["additionalMetadata", "count", "label"]);
        assert_eq!(planned[1].text(), Some("3"));
        assert_eq!(planned[2].text(), Some("plain"));
    }

    #[tokio::test]
    async fn test_plan_missing_file_uses_sentinel() {
        let temp = TempDir::new().unwrap();
        let planned = plan_multipart(vec![(
            "file".to_string(),
            PartValue::File(temp.path().join("absent.jpg")),
        )])
        .await;

        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].text(), Some(FILE_NOT_AVAILABLE));
    }

    #[tokio::test]
    async fn test_plan_unreadable_file_reports_name() {
        let temp = TempDir::new().unwrap();
        let directory = temp.path().join("photos");
        fs::create_dir(&directory).unwrap();

        let planned = plan_multipart(vec![("file".to_string(), PartValue::File(directory))]).await;
        assert_eq!(planned[0].text(), Some("Error loading file: photos"));
    }

    #[tokio::test]
    async fn test_plan_attaches_readable_file() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("dog.jpg");
        fs::write(&image, b"\xff\xd8\xff").unwrap();

        let planned = plan_multipart(vec![("file".to_string(), PartValue::File(image))]).await;
        assert_eq!(
            planned[0],
            PlannedPart::File {
                name: "file".to_string(),
                file_name: "dog.jpg".to_string(),
                bytes: b"\xff\xd8\xff".to_vec(),
            }
        );
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = ApiClient::new(&ApiConfig::new("http://localhost:8080/v2/")).unwrap();
        let url = client
            .url("/pet/{petId}", &PathParams::single("petId", 12))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v2/pet/12");
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let config = ApiConfig::new("http://localhost").with_api_key("bad\nkey");
        assert!(matches!(
            ApiClient::new(&config),
            Err(ApiError::InvalidHeader { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_sends_json_content_type_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pet/7"))
            .and(header("content-type", "application/json"))
            .and(header("api_key", "special-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .get_with("/pet/{petId}", &PathParams::single("petId", 7))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_line, "HTTP/1.1 200 OK");
        assert_eq!(response.json::<Value>().unwrap()["id"], 7);
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/pet/1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Pet not found"))
            .mount(&server)
            .await;

        let response = client_for(&server).delete("/pet/1").await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.body, "Pet not found");
    }

    #[tokio::test]
    async fn test_post_and_put_send_json_bodies() {
        let server = MockServer::start().await;
        let pet = json!({"id": 1, "name": "Rex"});

        Mock::given(method("POST"))
            .and(path("/pet"))
            .and(body_json(&pet))
            .respond_with(ResponseTemplate::new(200).set_body_json(&pet))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/pet"))
            .and(body_json(&pet))
            .respond_with(ResponseTemplate::new(200).set_body_json(&pet))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.post("/pet", &pet).await.unwrap().status, 200);
        assert_eq!(client.put("/pet", &pet).await.unwrap().status, 200);
    }

    #[tokio::test]
    async fn test_post_form_is_urlencoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pet/5"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("name=Rex+II&status=sold"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .post_form(
                "/pet/{petId}",
                &[("name", "Rex II"), ("status", "sold")],
                &PathParams::single("petId", 5),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_multipart_carries_sentinel_for_missing_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pet/9/uploadImage"))
            .respond_with(|request: &Request| {
                let body = String::from_utf8_lossy(&request.body).to_string();
                let content_type = request
                    .headers
                    .get("content-type")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                ResponseTemplate::new(200).set_body_json(json!({
                    "multipart": content_type.starts_with("multipart/form-data"),
                    "sentinel": body.contains(FILE_NOT_AVAILABLE),
                    "metadata": body.contains("front view"),
                }))
            })
            .mount(&server)
            .await;

        let response = client_for(&server)
            .post_multipart(
                "/pet/{petId}/uploadImage",
                vec![
                    ("additionalMetadata".to_string(), "front view".into()),
                    ("file".to_string(), PartValue::File(PathBuf::from("/nonexistent/dog.jpg"))),
                ],
                &PathParams::single("petId", 9),
            )
            .await
            .unwrap();

        let echoed: Value = response.json().unwrap();
        assert_eq!(echoed, json!({"multipart": true, "sentinel": true, "metadata": true}));
    }

    #[tokio::test]
    async fn test_delete_unauthenticated_omits_key() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/pet/3"))
            .respond_with(|request: &Request| {
                let status = if request.headers.contains_key("api_key") { 200 } else { 401 };
                ResponseTemplate::new(status)
            })
            .mount(&server)
            .await;

        let client = client_for(&server);
        let params = PathParams::single("petId", 3);
        assert_eq!(client.delete_with("/pet/{petId}", &params).await.unwrap().status, 200);
        assert_eq!(
            client.delete_unauthenticated("/pet/{petId}", &params).await.unwrap().status,
            401
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_reinterpreted() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let client = ApiClient::new(&ApiConfig::new(format!("http://127.0.0.1:{port}"))).unwrap();

        let error = client.get("/pet/1").await.unwrap_err();
        assert!(error.is_transport());
    }
}
