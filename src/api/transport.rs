//! HTTP Transport
//!
//! Request/response types and the `Transport` seam. The browser build sends
//! through `reqwest` (fetch backend); tests plug in a scripted transport.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Characters escaped in query keys and values
const QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?');

/// Characters escaped in a single path segment
pub(crate) const PATH_SEGMENT: &AsciiSet = &QUERY.add(b'/');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A file picked in a form
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: FileUpload },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub token: Option<String>,
    pub body: RequestBody,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            token: None,
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// URL with the encoded query string appended
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", utf8_percent_encode(k, QUERY), utf8_percent_encode(v, QUERY)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.url, query)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `ApiError::Server` carrying the server's message
    pub fn error_for_status(self) -> ApiResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Server {
                status: self.status,
                message: self.error_message(),
            })
        }
    }

    fn error_message(&self) -> String {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&self.body) {
            for key in ["message", "error", "msg"] {
                if let Some(Value::String(msg)) = map.get(key) {
                    return msg.clone();
                }
            }
        }
        let text = self.body.trim();
        if !text.is_empty() && text.len() <= 200 && !text.starts_with('<') {
            return text.to_string();
        }
        format!("Request failed with status {}", self.status)
    }

    /// Decode the payload, accepting either a bare value or a `{ "data": ... }` envelope
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let value: Value = serde_json::from_str(&self.body)?;
        decode_payload(value)
    }

    /// Like `json`, but an empty body or a payload of another shape yields `None`
    pub fn json_opt<T: DeserializeOwned>(&self) -> Option<T> {
        if self.body.trim().is_empty() {
            return None;
        }
        self.json().ok()
    }
}

fn decode_payload<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    if let Value::Object(map) = &value {
        if let Some(data) = map.get("data") {
            if let Ok(decoded) = serde_json::from_value(data.clone()) {
                return Ok(decoded);
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Sends one request and returns the raw response, whatever its status
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

/// `reqwest`-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }

    fn build_form(parts: Vec<FormPart>) -> ApiResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File { name, file } => {
                    let piece = reqwest::multipart::Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.mime)
                        .map_err(|e| ApiError::Network(e.to_string()))?;
                    form.part(name, piece)
                }
            };
        }
        Ok(form)
    }

    async fn dispatch(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let limit = request.timeout;
        let mut builder = self.client.request(method, request.full_url());

        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match limit {
            Some(limit) => builder.timeout(limit),
            None => builder,
        };
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(Self::build_form(parts)?),
        };

        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                ApiError::Timeout(limit.unwrap_or_default())
            } else {
                ApiError::Network(e.to_string())
            }
        };
        let response = builder.send().await.map_err(map_err)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_err)?;
        Ok(ApiResponse { status, body })
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        tracing::debug!("{} {}", request.method.as_str(), request.url);
        #[cfg(target_arch = "wasm32")]
        let result = match request.timeout {
            Some(limit) => with_timeout(limit, self.dispatch(request)).await,
            None => self.dispatch(request).await,
        };
        #[cfg(not(target_arch = "wasm32"))]
        let result = self.dispatch(request).await;
        result
    }
}

/// Race the request against a browser timer; fetch has no native timeout
#[cfg(target_arch = "wasm32")]
async fn with_timeout<F>(limit: Duration, request: F) -> ApiResult<ApiResponse>
where
    F: std::future::Future<Output = ApiResult<ApiResponse>>,
{
    use futures::future::{select, Either};

    let request = Box::pin(request);
    let timer = Box::pin(gloo_timers::future::sleep(limit));
    match select(request, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(ApiError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_full_url_encodes_query() {
        let req = ApiRequest::new(Method::Get, "http://api/labs")
            .query("search", "blood & urine")
            .query("page", 2);
        assert_eq!(req.full_url(), "http://api/labs?search=blood%20%26%20urine&page=2");
    }

    #[test]
    fn test_json_accepts_bare_and_envelope() {
        let bare = ApiResponse::new(200, r#"{"name":"CBC"}"#);
        let wrapped = ApiResponse::new(200, r#"{"success":true,"data":{"name":"CBC"}}"#);
        assert_eq!(bare.json::<Named>().unwrap(), Named { name: "CBC".into() });
        assert_eq!(wrapped.json::<Named>().unwrap(), Named { name: "CBC".into() });
    }

    #[test]
    fn test_json_opt_on_empty_or_foreign_body() {
        assert_eq!(ApiResponse::new(204, "").json_opt::<Named>(), None);
        assert_eq!(ApiResponse::new(200, r#"{"success":true}"#).json_opt::<Named>(), None);
    }

    #[test]
    fn test_error_for_status_extracts_message() {
        let err = ApiResponse::new(400, r#"{"message":"Code already used"}"#)
            .error_for_status()
            .unwrap_err();
        assert_eq!(err, ApiError::Server { status: 400, message: "Code already used".into() });

        let err = ApiResponse::new(502, "<html>bad gateway</html>").error_for_status().unwrap_err();
        assert_eq!(err.user_message(), "Request failed with status 502");
    }
}
