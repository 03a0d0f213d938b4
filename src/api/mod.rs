//! REST API Access
//!
//! `ApiClient` binds a transport to the configured base URL and the current
//! bearer token. `ResourceApi<R>` is the generic list/get/create/update/
//! delete/toggle surface every management screen goes through.

mod transport;
pub mod auth;

#[cfg(test)]
pub mod testing;

use std::marker::PhantomData;
use std::rc::Rc;

use percent_encoding::utf8_percent_encode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::ApiResult;
use crate::models::Resource;

pub use transport::{
    ApiRequest, ApiResponse, FileUpload, FormPart, HttpTransport, Method, RequestBody, Transport,
};

/// Shared handle to the backend
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    config: Rc<AppConfig>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>, config: AppConfig) -> Self {
        Self {
            transport,
            config: Rc::new(config),
            token: None,
        }
    }

    pub fn http(config: AppConfig) -> Self {
        Self::new(Rc::new(HttpTransport::new()), config)
    }

    /// Same transport and config, different credentials
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
            token,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest::new(method, self.url(path)).bearer(self.token.clone())
    }

    /// Send and fail on non-2xx
    pub async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let method = request.method;
        let url = request.url.clone();
        match self.transport.send(request).await.and_then(ApiResponse::error_for_status) {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!("{} {} failed: {}", method.as_str(), url, e);
                Err(e)
            }
        }
    }

    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        self.execute(request).await?.json()
    }

    /// `(id, label)` pairs for a reference select, e.g. the cities a lab can belong to
    pub async fn reference_options(&self, endpoint: &str) -> ApiResult<Vec<(String, String)>> {
        let records: Vec<Value> = self.fetch(self.request(Method::Get, endpoint)).await?;
        let mut options: Vec<(String, String)> = records
            .iter()
            .filter_map(|record| {
                let id = ["_id", "id"].iter().find_map(|k| record.get(*k).and_then(scalar_text))?;
                let label = ["name", "title", "code"]
                    .iter()
                    .find_map(|k| record.get(*k).and_then(scalar_text))
                    .unwrap_or_else(|| id.clone());
                Some((id, label))
            })
            .collect();
        options.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()));
        Ok(options)
    }

    pub fn resource<R: Resource>(&self) -> ResourceApi<R> {
        ResourceApi {
            client: self.clone(),
            _marker: PhantomData,
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Filter forwarded to endpoints that search server-side. Paging stays
/// client-side so the local slice always matches what was fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// Typed CRUD access to one resource endpoint
pub struct ResourceApi<R> {
    client: ApiClient,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceApi<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R: Resource> ResourceApi<R> {
    fn item_path(id: &R::Id, suffix: &str) -> String {
        let id = id.to_string();
        let segment = utf8_percent_encode(&id, transport::PATH_SEGMENT);
        format!("{}/{}{}", R::ENDPOINT, segment, suffix)
    }

    /// Uploads to image-bearing endpoints may get a longer timeout
    fn with_upload_timeout(&self, request: ApiRequest) -> ApiRequest {
        if R::SLOW_UPLOAD && request.body.is_multipart() {
            let limit = self.client.config().upload_timeout();
            request.timeout(limit)
        } else {
            request
        }
    }

    pub async fn list(&self, query: &ListQuery) -> ApiResult<Vec<R>> {
        let mut request = self.client.request(Method::Get, R::ENDPOINT);
        if R::SERVER_SEARCH {
            if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
                request = request.query("search", search);
            }
        }
        self.client.fetch(request).await
    }

    pub async fn get(&self, id: &R::Id) -> ApiResult<R> {
        let request = self.client.request(Method::Get, &Self::item_path(id, ""));
        self.client.fetch(request).await
    }

    /// Create; returns the stored record when the server echoes it
    pub async fn create(&self, body: RequestBody) -> ApiResult<Option<R>> {
        let path = R::CREATE_PATH.unwrap_or(R::ENDPOINT);
        let request = self.with_upload_timeout(self.client.request(Method::Post, path).body(body));
        Ok(self.client.execute(request).await?.json_opt())
    }

    pub async fn update(&self, id: &R::Id, body: RequestBody) -> ApiResult<Option<R>> {
        let request = self.client.request(Method::Put, &Self::item_path(id, "")).body(body);
        let request = self.with_upload_timeout(request);
        Ok(self.client.execute(request).await?.json_opt())
    }

    pub async fn delete(&self, id: &R::Id) -> ApiResult<()> {
        let request = self.client.request(Method::Delete, &Self::item_path(id, ""));
        self.client.execute(request).await.map(|_| ())
    }

    pub async fn bulk_delete(&self, ids: &[R::Id]) -> ApiResult<()> {
        let path = format!("{}/bulk-delete", R::ENDPOINT);
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let request = self.client.request(Method::Post, &path).json(json!({ "ids": ids }));
        self.client.execute(request).await.map(|_| ())
    }

    /// Flip the record's active flag; `None` when the server doesn't echo the record
    pub async fn toggle_status(&self, record: &R) -> ApiResult<Option<R>> {
        let mut body = serde_json::Map::new();
        body.insert(R::STATUS_FIELD.to_string(), json!(!record.is_active()));
        let request = self
            .client
            .request(Method::Patch, &Self::item_path(&record.id(), "/toggle-status"))
            .json(body.into());
        let echoed: Option<R> = self.client.execute(request).await?.json_opt();
        // Acknowledgements like {"success":true} decode to a defaulted record
        Ok(echoed.filter(|r| r.id() == record.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;
    use crate::models::{Category, Certificate, Lab};

    fn client(transport: &ScriptedTransport) -> ApiClient {
        ApiClient::new(Rc::new(transport.clone()), AppConfig::default()).with_token(Some("t0k".into()))
    }

    #[tokio::test]
    async fn test_list_decodes_and_sends_token() {
        let transport = ScriptedTransport::new();
        transport.reply(200, r#"{"data":[{"_id":"c1","name":"Blood","sortOrder":1,"isActive":true}]}"#);

        let items = client(&transport).resource::<Category>().list(&ListQuery::default()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Blood");

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.url, "http://localhost:5000/api/categories");
        assert_eq!(sent.token.as_deref(), Some("t0k"));
        assert!(sent.query.is_empty());
    }

    #[tokio::test]
    async fn test_reference_options_sorted_by_label() {
        let transport = ScriptedTransport::new();
        transport.reply(
            200,
            r#"{"data":[{"_id":"s2","name":"kerala"},{"id":7,"name":"Goa"},{"_id":"s9"},{"name":"no id"}]}"#,
        );

        let options = client(&transport).reference_options("states").await.unwrap();
        assert_eq!(
            options,
            vec![
                ("7".to_string(), "Goa".to_string()),
                ("s2".to_string(), "kerala".to_string()),
                ("s9".to_string(), "s9".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_server_search_forwards_query() {
        let transport = ScriptedTransport::new();
        transport.reply(200, "[]");
        let query = ListQuery { search: Some("apollo".into()) };

        client(&transport).resource::<Lab>().list(&query).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.query, vec![("search".to_string(), "apollo".to_string())]);
    }

    #[tokio::test]
    async fn test_toggle_status_body_and_path() {
        let transport = ScriptedTransport::new();
        transport.reply(200, r#"{"success":true}"#);
        let category = Category { id: "c 1".into(), name: "Blood".into(), is_active: true, ..Default::default() };

        let echoed = client(&transport).resource::<Category>().toggle_status(&category).await.unwrap();
        assert!(echoed.is_none());

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Patch);
        assert_eq!(sent.url, "http://localhost:5000/api/categories/c%201/toggle-status");
        assert_eq!(sent.body, RequestBody::Json(json!({ "isActive": false })));
    }

    #[tokio::test]
    async fn test_certificate_upload_gets_upload_timeout() {
        let transport = ScriptedTransport::new();
        transport.reply(201, "");
        let body = RequestBody::Multipart(vec![FormPart::Text { name: "title".into(), value: "NABL".into() }]);

        client(&transport).resource::<Certificate>().create(body).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.url, "http://localhost:5000/api/certificates/upload");
        assert_eq!(sent.timeout, Some(std::time::Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_delete_surfaces_server_message() {
        let transport = ScriptedTransport::new();
        transport.reply(409, r#"{"message":"Category has items"}"#);

        let err = client(&transport).resource::<Category>().delete(&"c1".to_string()).await.unwrap_err();
        assert_eq!(err.user_message(), "Category has items");
    }
}
