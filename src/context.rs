//! Application Context
//!
//! Shared handles provided via Leptos Context API. Everything here is
//! `Copy`; values holding `Rc` live in local-storage arenas.

use std::rc::Rc;

use chrono::Utc;
use leptos::prelude::*;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::route::Route;
use crate::session::SessionStore;
use crate::storage::StorageAdapter;

#[derive(Clone, Copy)]
pub struct AppContext {
    pub config: StoredValue<AppConfig>,
    api: StoredValue<ApiClient, LocalStorage>,
    storage: StoredValue<Rc<dyn StorageAdapter>, LocalStorage>,
    /// Session store; read with `.with(...)`
    pub session: RwSignal<SessionStore, LocalStorage>,
    pub route: RwSignal<Route>,
}

impl AppContext {
    pub fn new(config: AppConfig, api: ApiClient, storage: Rc<dyn StorageAdapter>) -> Self {
        let session = SessionStore::restore(storage.clone(), Utc::now());
        Self {
            config: StoredValue::new(config),
            api: StoredValue::new_local(api),
            storage: StoredValue::new_local(storage),
            session: RwSignal::new_local(session),
            route: RwSignal::new(Route::Home),
        }
    }

    /// Client without credentials, for storefront reads
    pub fn public_api(&self) -> ApiClient {
        self.api.get_value()
    }

    /// Client carrying the current bearer token
    pub fn api(&self) -> ApiClient {
        let token = self.session.with_untracked(|s| s.token());
        self.api.with_value(|api| api.with_token(token))
    }

    pub fn storage(&self) -> Rc<dyn StorageAdapter> {
        self.storage.get_value()
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!("Navigate to {:?}", route);
        self.route.set(route);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_authenticated())
    }

    /// Log out when the stored expiry has passed. Returns true when it did.
    pub fn check_session(&self) -> bool {
        let now = Utc::now();
        let expired = self.session.with_untracked(|s| s.is_authenticated() && !s.is_valid(now));
        if expired {
            self.session.update(|s| {
                s.check_expiry(now);
            });
        }
        expired
    }

    pub fn logout(&self) {
        self.session.update(|s| s.logout());
        self.navigate(Route::Login);
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
