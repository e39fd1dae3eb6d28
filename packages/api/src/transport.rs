//! # Transport: the seam between the client core and the network
//!
//! Every backend call is expressed as an [`ApiRequest`] (method, path
//! segments, query, body, optional bearer token) and answered by an [`ApiResponse`] (status +
//! raw body). The [`Transport`] trait turns one into the other; it reports
//! *every* HTTP status as a response and only fails when no response arrived.
//! Interpreting statuses is the [`Gateway`](crate::Gateway)'s job.
//!
//! [`HttpTransport`] is the production implementation on top of `reqwest`.
//! Tests use [`MockTransport`](crate::mock::MockTransport) instead.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use store::ClientConfig;

use crate::error::ApiError;

/// Request body encodings the backend accepts.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`, used by the login endpoint.
    Form(Vec<(String, String)>),
}

/// One outbound call, relative to the configured base URL.
///
/// `path` is the readable route (`/products/p1/reviews`) used for logs and
/// test routing. `segments` is what goes on the wire; each one is
/// percent-encoded when the URL is built, so ids pushed with
/// [`ApiRequest::push`] can never add path components.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Filled in by the gateway at send time.
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// `path` is a fixed route such as `/products/`; a trailing slash is kept.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let segments = path
            .strip_prefix('/')
            .unwrap_or(&path)
            .split('/')
            .map(str::to_string)
            .collect();
        Self {
            method,
            path,
            segments,
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one path segment, typically an id.
    pub fn push(mut self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        if self.segments.last().is_some_and(String::is_empty) {
            self.segments.pop();
        }
        self.path = format!("{}/{segment}", self.path.trim_end_matches('/'));
        self.segments.push(segment);
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Value of the `Authorization` header this request will carry.
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|token| format!("Bearer {token}"))
    }
}

/// A response of any status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Async request/response exchange with the backend.
pub trait Transport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<ApiResponse, ApiError>>;
}

/// `reqwest`-backed transport.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim().trim_end_matches('/'))
            .map_err(|e| ApiError::BaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Build a transport from `yorumator.toml` settings.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        #[allow(unused_mut)]
        let mut builder = reqwest::Client::builder().user_agent("Yorumator");
        #[cfg(not(target_arch = "wasm32"))]
        if config.api.timeout_secs > 0 {
            builder = builder.timeout(std::time::Duration::from_secs(u64::from(
                config.api.timeout_secs,
            )));
        }
        Self::with_client(builder.build()?, config.base_url())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, request: &ApiRequest) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `with_client`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(&request.segments);
        }
        url
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(authorization) = request.authorization() {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get("/products/")
            .query("limit", 20)
            .query("sort_by", "rating_desc");
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "20".to_string()),
                ("sort_by".to_string(), "rating_desc".to_string()),
            ]
        );
        assert_eq!(request.authorization(), None);
    }

    #[test]
    fn test_authorization_header_value() {
        let mut request = ApiRequest::get("/users/me");
        request.bearer = Some("T1".to_string());
        assert_eq!(request.authorization().as_deref(), Some("Bearer T1"));
    }

    #[test]
    fn test_base_url_is_normalised() {
        let transport = HttpTransport::new("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(
            transport.url(&ApiRequest::get("/users/me")).as_str(),
            "http://localhost:8000/api/v1/users/me"
        );
        assert_eq!(
            transport.url(&ApiRequest::get("/products/")).as_str(),
            "http://localhost:8000/api/v1/products/"
        );
    }

    #[test]
    fn test_pushed_ids_are_single_segments() {
        let transport = HttpTransport::new("http://localhost:8000/api/v1").unwrap();
        let request = ApiRequest::get("/products").push("a/b?c").push("reviews");
        assert_eq!(request.path, "/products/a/b?c/reviews");
        assert_eq!(
            transport.url(&request).as_str(),
            "http://localhost:8000/api/v1/products/a%2Fb%3Fc/reviews"
        );

        let request = ApiRequest::get("/notifications").push("ü");
        assert_eq!(transport.url(&request).as_str(), "http://localhost:8000/api/v1/notifications/%C3%BC");
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(matches!(HttpTransport::new("not a url"), Err(ApiError::BaseUrl(_))));
        assert!(matches!(HttpTransport::new("mailto:a@b.com"), Err(ApiError::BaseUrl(_))));
    }
}
