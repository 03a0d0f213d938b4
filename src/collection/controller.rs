//! Collection Controller
//!
//! Runs list/toggle/delete/submit against a `ResourceApi` and folds the
//! outcome into `CollectionState`. Failures are logged, turned into a
//! notice, and leave the last good state in place. Toggle and delete patch
//! the local list; create and update refetch it.

use std::marker::PhantomData;
use std::rc::Rc;

use tracing::{info, warn};

use super::cell::StateCell;
use super::state::CollectionState;
use crate::api::ResourceApi;
use crate::confirm::{BrowserConfirm, Confirm};
use crate::error::{ApiError, ApiResult};
use crate::form::{self, FormValues};
use crate::lifetime::Lifetime;
use crate::models::Resource;

pub struct Collection<R: Resource, C: StateCell<CollectionState<R>>> {
    api: ResourceApi<R>,
    state: C,
    lifetime: Lifetime,
    confirm: Rc<dyn Confirm>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource, C: StateCell<CollectionState<R>>> Clone for Collection<R, C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            lifetime: self.lifetime.clone(),
            confirm: self.confirm.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R: Resource, C: StateCell<CollectionState<R>>> Collection<R, C> {
    pub fn new(api: ResourceApi<R>, state: C, lifetime: Lifetime) -> Self {
        Self {
            api,
            state,
            lifetime,
            confirm: Rc::new(BrowserConfirm),
            _marker: PhantomData,
        }
    }

    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Rc::new(confirm);
        self
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    fn notify_failure(&self, action: &str, error: &ApiError) {
        warn!("{} {} failed: {}", action, R::LABEL, error);
        let message = format!("Could not {} {}: {}", action, R::LABEL.to_lowercase(), error.user_message());
        self.state.modify(|s| {
            s.notices.error(message);
        });
    }

    /// Reload the whole list. Returns the number of records received.
    pub async fn fetch_list(&self) -> ApiResult<usize> {
        let query = self.state.inspect(|s| s.list_query());
        self.state.modify(|s| s.loading = true);

        match self.lifetime.run(self.api.list(&query)).await {
            Ok(items) => {
                let count = items.len();
                info!("Loaded {} {} record(s)", count, R::LABEL);
                self.state.modify(|s| {
                    s.loading = false;
                    s.replace_items(items);
                });
                Ok(count)
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                self.state.modify(|s| s.loading = false);
                self.notify_failure("load", &e);
                Err(e)
            }
        }
    }

    /// Flip the active flag of one record and patch it in place
    pub async fn toggle_status(&self, id: R::Id) -> ApiResult<R> {
        let Some(record) = self.state.inspect(|s| s.find(&id).cloned()) else {
            return Err(ApiError::NotFound(format!("{} {}", R::LABEL, id)));
        };

        match self.lifetime.run(self.api.toggle_status(&record)).await {
            Ok(echoed) => {
                let updated = echoed.unwrap_or_else(|| {
                    let mut flipped = record.clone();
                    flipped.set_active(!record.is_active());
                    flipped
                });
                let status = if updated.is_active() { "activated" } else { "deactivated" };
                let message = format!("{} {}", R::LABEL, status);
                let patched = updated.clone();
                self.state.modify(|s| {
                    s.patch(patched);
                    s.notices.success(message);
                });
                Ok(updated)
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                self.notify_failure("update", &e);
                Err(e)
            }
        }
    }

    /// Delete one record after confirmation. `Ok(false)` when the user declined.
    pub async fn delete(&self, id: R::Id) -> ApiResult<bool> {
        let prompt = format!("Delete this {}? This cannot be undone.", R::LABEL.to_lowercase());
        if !self.confirm.confirm(&prompt) {
            return Ok(false);
        }

        match self.lifetime.run(self.api.delete(&id)).await {
            Ok(()) => {
                info!("Deleted {} {}", R::LABEL, id);
                self.state.modify(|s| {
                    s.remove(&id);
                    s.notices.success(format!("{} deleted", R::LABEL));
                });
                Ok(true)
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                self.notify_failure("delete", &e);
                Err(e)
            }
        }
    }

    /// Delete several records in one request after a single confirmation
    pub async fn bulk_delete(&self, ids: Vec<R::Id>) -> ApiResult<bool> {
        if ids.is_empty() {
            return Ok(false);
        }
        let prompt = format!("Delete {} selected record(s)? This cannot be undone.", ids.len());
        if !self.confirm.confirm(&prompt) {
            return Ok(false);
        }

        match self.lifetime.run(self.api.bulk_delete(&ids)).await {
            Ok(()) => {
                info!("Deleted {} {} record(s)", ids.len(), R::LABEL);
                let count = ids.len();
                self.state.modify(|s| {
                    s.remove_many(&ids);
                    s.notices.success(format!("{} record(s) deleted", count));
                });
                Ok(true)
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                self.notify_failure("delete", &e);
                Err(e)
            }
        }
    }

    /// Delete whatever is currently selected
    pub async fn delete_selected(&self) -> ApiResult<bool> {
        let ids = self.state.inspect(|s| s.selected_ids());
        self.bulk_delete(ids).await
    }

    pub fn open_create(&self) {
        self.state.modify(|s| s.open_create());
    }

    pub fn open_edit(&self, record: R) {
        self.state.modify(|s| s.open_edit(record));
    }

    pub fn close_dialog(&self) {
        self.state.modify(|s| s.close_dialog());
    }

    /// Validate and send the modal form; on success close it and refetch
    pub async fn submit(&self, values: FormValues) -> ApiResult<()> {
        let schema = R::schema();
        if let Err(errors) = form::validate(schema, &values) {
            let shown = errors.clone();
            self.state.modify(|s| {
                s.form = values;
                s.form_errors = shown;
                s.submit_error = None;
            });
            return Err(ApiError::Validation(errors));
        }

        let editing = self.state.inspect(|s| s.editing.as_ref().map(Resource::id));
        let body = form::to_body(schema, &values, editing.is_some());
        self.state.modify(|s| {
            s.form = values;
            s.form_errors.clear();
            s.submit_error = None;
            s.submitting = true;
        });

        let result = match &editing {
            Some(id) => self.lifetime.run(self.api.update(id, body)).await,
            None => self.lifetime.run(self.api.create(body)).await,
        };

        match result {
            Ok(_) => {
                let verb = if editing.is_some() { "updated" } else { "created" };
                info!("{} {}", R::LABEL, verb);
                self.state.modify(|s| {
                    s.close_dialog();
                    s.notices.success(format!("{} {}", R::LABEL, verb));
                });
                // A failed refetch reports itself; the write already succeeded
                let _ = self.fetch_list().await;
                Ok(())
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                warn!("Saving {} failed: {}", R::LABEL, e);
                let message = e.user_message();
                self.state.modify(|s| {
                    s.submitting = false;
                    s.submit_error = Some(message);
                });
                Err(e)
            }
        }
    }

    pub fn set_search(&self, search: String) {
        self.state.modify(|s| s.set_search(search));
    }

    pub fn set_page(&self, page: usize) {
        self.state.modify(|s| s.set_page(page));
    }

    pub fn set_page_size(&self, page_size: usize) {
        self.state.modify(|s| s.set_page_size(page_size));
    }

    pub fn toggle_select(&self, id: R::Id) {
        self.state.modify(|s| s.toggle_select(id));
    }

    pub fn select_all_visible(&self) {
        self.state.modify(|s| s.select_all_visible());
    }

    pub fn clear_selection(&self) {
        self.state.modify(|s| s.clear_selection());
    }

    pub fn dismiss_notice(&self, id: u64) {
        self.state.modify(|s| s.notices.dismiss(id));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::{ApiClient, Method, RequestBody};
    use crate::config::AppConfig;
    use crate::models::{Banner, Category};
    use crate::notice::NoticeLevel;

    type Cell = Rc<RefCell<CollectionState<Category>>>;

    const THREE: &str = r#"[
        {"_id":"c1","name":"Blood","sortOrder":1,"isActive":true},
        {"_id":"c2","name":"Urine","sortOrder":2,"isActive":true},
        {"_id":"c3","name":"Thyroid","sortOrder":3,"isActive":false}
    ]"#;

    fn setup() -> (ScriptedTransport, Collection<Category, Cell>) {
        let transport = ScriptedTransport::new();
        let client = ApiClient::new(Rc::new(transport.clone()), AppConfig::default());
        let state: Cell = Rc::new(RefCell::new(CollectionState::new(10)));
        let collection = Collection::new(client.resource(), state, Lifetime::new()).with_confirm(|_: &str| true);
        (transport, collection)
    }

    async fn loaded() -> (ScriptedTransport, Collection<Category, Cell>) {
        let (transport, collection) = setup();
        transport.reply(200, THREE);
        collection.fetch_list().await.unwrap();
        (transport, collection)
    }

    #[tokio::test]
    async fn test_fetch_replaces_items() {
        let (_transport, collection) = loaded().await;
        collection.state().inspect(|s| {
            assert_eq!(s.items.len(), 3);
            assert!(!s.loading);
            assert_eq!(s.page_view().summary(), "Showing 1-3 of 3");
        });
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_last_good_list() {
        let (transport, collection) = loaded().await;
        transport.fail(ApiError::Network("offline".into()));

        let err = collection.fetch_list().await.unwrap_err();
        assert_eq!(err, ApiError::Network("offline".into()));
        collection.state().inspect(|s| {
            assert_eq!(s.items.len(), 3);
            assert!(!s.loading);
            assert_eq!(s.notices.latest().unwrap().level, NoticeLevel::Error);
        });
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_status() {
        let (transport, collection) = loaded().await;
        transport.reply(200, r#"{"success":true}"#);
        transport.reply(200, r#"{"data":{"_id":"c1","name":"Blood","sortOrder":1,"isActive":true}}"#);

        let first = collection.toggle_status("c1".into()).await.unwrap();
        assert!(!first.is_active);
        let second = collection.toggle_status("c1".into()).await.unwrap();
        assert!(second.is_active);

        let mutations: Vec<_> = transport.requests().into_iter().filter(|r| r.method == Method::Patch).collect();
        assert_eq!(mutations.len(), 2);
        assert_eq!(mutations[0].body, RequestBody::Json(serde_json::json!({ "isActive": false })));
        assert_eq!(mutations[1].body, RequestBody::Json(serde_json::json!({ "isActive": true })));
        collection.state().inspect(|s| assert!(s.find(&"c1".to_string()).unwrap().is_active));
    }

    #[tokio::test]
    async fn test_failed_toggle_leaves_record() {
        let (transport, collection) = loaded().await;
        transport.reply(500, r#"{"message":"boom"}"#);

        assert!(collection.toggle_status("c2".into()).await.is_err());
        collection.state().inspect(|s| {
            assert!(s.find(&"c2".to_string()).unwrap().is_active);
            assert!(s.notices.latest().unwrap().message.ends_with("boom"));
        });
    }

    #[tokio::test]
    async fn test_toggle_unknown_id() {
        let (transport, collection) = loaded().await;
        let err = collection.toggle_status("zz".into()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record_visible() {
        let (transport, collection) = loaded().await;
        transport.reply(409, r#"{"message":"Category is in use"}"#);

        assert!(collection.delete("c1".into()).await.is_err());
        collection.state().inspect(|s| {
            assert!(s.find(&"c1".to_string()).is_some());
            assert_eq!(s.page_view().rows.len(), 3);
        });
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let (transport, collection) = loaded().await;
        transport.reply(204, "");

        assert_eq!(collection.delete("c1".into()).await, Ok(true));
        collection.state().inspect(|s| assert_eq!(s.items.len(), 2));
        assert_eq!(transport.requests()[1].method, Method::Delete);
    }

    #[tokio::test]
    async fn test_declined_confirm_sends_nothing() {
        let (transport, collection) = loaded().await;
        let collection = collection.with_confirm(|_: &str| false);

        assert_eq!(collection.delete("c1".into()).await, Ok(false));
        assert_eq!(transport.request_count(), 1);
        collection.state().inspect(|s| assert_eq!(s.items.len(), 3));
    }

    #[tokio::test]
    async fn test_bulk_delete_selected() {
        let (transport, collection) = loaded().await;
        transport.reply(200, r#"{"success":true}"#);
        collection.toggle_select("c1".into());
        collection.toggle_select("c3".into());

        assert_eq!(collection.delete_selected().await, Ok(true));
        collection.state().inspect(|s| {
            let names: Vec<&str> = s.items.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["Urine"]);
            assert!(s.selected.is_empty());
        });
        assert_eq!(
            transport.requests()[1].body,
            RequestBody::Json(serde_json::json!({ "ids": ["c1", "c3"] }))
        );
    }

    #[tokio::test]
    async fn test_submit_with_missing_required_field_sends_nothing() {
        let (transport, collection) = loaded().await;
        collection.open_create();

        let err = collection.submit(FormValues::new().with_text("name", "  ")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(transport.request_count(), 1);
        collection.state().inspect(|s| {
            assert!(s.dialog_open);
            assert_eq!(s.form_errors.get("name").unwrap(), "Name is required");
        });
    }

    #[tokio::test]
    async fn test_submit_create_closes_and_refetches() {
        let (transport, collection) = loaded().await;
        transport.reply(201, r#"{"_id":"c4","name":"Liver","isActive":true}"#);
        transport.reply(200, r#"[{"_id":"c4","name":"Liver","isActive":true}]"#);
        collection.open_create();

        collection.submit(FormValues::new().with_text("name", "Liver")).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[1].method, Method::Post);
        assert_eq!(requests[2].method, Method::Get);
        collection.state().inspect(|s| {
            assert!(!s.dialog_open);
            assert_eq!(s.items.len(), 1);
        });
    }

    #[tokio::test]
    async fn test_submit_update_uses_put_on_record() {
        let (transport, collection) = loaded().await;
        transport.reply(200, "");
        transport.reply(200, THREE);
        let record = collection.state().inspect(|s| s.items[1].clone());
        collection.open_edit(record);
        let values = collection.state().inspect(|s| s.form.clone()).with_text("name", "Urine Routine");

        collection.submit(values).await.unwrap();

        let update = &transport.requests()[1];
        assert_eq!(update.method, Method::Put);
        assert!(update.url.ends_with("/categories/c2"));
    }

    #[tokio::test]
    async fn test_update_sends_cleared_description() {
        let (transport, collection) = setup();
        transport.reply(200, r#"[{"_id":"c1","name":"Blood","description":"old text","sortOrder":1,"isActive":true}]"#);
        collection.fetch_list().await.unwrap();
        transport.reply(200, "");
        transport.reply(200, THREE);

        let record = collection.state().inspect(|s| s.items[0].clone());
        collection.open_edit(record);
        let values = collection.state().inspect(|s| s.form.clone()).with_text("description", "");
        collection.submit(values).await.unwrap();

        let update = &transport.requests()[1];
        assert_eq!(update.method, Method::Put);
        assert_eq!(
            update.body,
            RequestBody::Json(serde_json::json!({
                "name": "Blood",
                "description": "",
                "sortOrder": 1,
                "isActive": true
            }))
        );
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_dialog_with_server_message() {
        let (transport, collection) = loaded().await;
        transport.reply(422, r#"{"message":"Category name already exists"}"#);
        collection.open_create();

        assert!(collection.submit(FormValues::new().with_text("name", "Blood")).await.is_err());
        collection.state().inspect(|s| {
            assert!(s.dialog_open);
            assert!(!s.submitting);
            assert_eq!(s.submit_error.as_deref(), Some("Category name already exists"));
            assert_eq!(s.form.text("name"), "Blood");
        });
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_lifetime_never_patches_state() {
        let (transport, collection) = setup();
        transport.reply(200, THREE);
        collection.lifetime.cancel();

        assert_eq!(collection.fetch_list().await, Err(ApiError::Cancelled));
        collection.state().inspect(|s| {
            assert!(s.items.is_empty());
            assert!(s.notices.is_empty());
        });
    }

    #[tokio::test]
    async fn test_multipart_when_image_attached() {
        let transport = ScriptedTransport::new();
        let client = ApiClient::new(Rc::new(transport.clone()), AppConfig::default());
        let state = Rc::new(RefCell::new(CollectionState::<Banner>::new(10)));
        let collection = Collection::new(client.resource(), state, Lifetime::new());
        transport.reply(201, "");
        transport.reply(200, "[]");
        collection.open_create();

        let mut values = collection.state().inspect(|s| s.form.clone()).with_text("title", "Monsoon offer");
        values.set_file(
            "image",
            crate::api::FileUpload { file_name: "b.jpg".into(), mime: "image/jpeg".into(), bytes: vec![0xff, 0xd8] },
        );
        collection.submit(values).await.unwrap();

        assert!(transport.requests()[0].body.is_multipart());
    }
}
