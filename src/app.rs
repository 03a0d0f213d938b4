//! DiagLab App
//!
//! Root component: builds the shared context, restores the session and the
//! cart, then switches between storefront and admin views on `Route`.

use std::rc::Rc;

use gloo_timers::callback::Interval;
use leptos::prelude::*;

use crate::api::ApiClient;
use crate::cart::Cart;
use crate::components::LoginForm;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::pages::{
    load_catalog, AdminShell, BlogListPage, BlogPostPage, CartPage, HomePage, LabFinderPage, PackagesPage,
    ShopHeader,
};
use crate::route::Route;
use crate::storage::{BrowserStorage, MemoryStorage, StorageAdapter};
use crate::store::{ShopState, ShopStore};

#[derive(Debug, Clone, PartialEq)]
enum Screen {
    Shop(Route),
    Login,
    Admin,
}

/// How often an open admin session is checked against its expiry
const SESSION_CHECK_MS: u32 = 60_000;

fn browser_storage() -> Rc<dyn StorageAdapter> {
    let available = web_sys::window().and_then(|w| w.local_storage().ok().flatten()).is_some();
    if available {
        Rc::new(BrowserStorage)
    } else {
        tracing::warn!("localStorage unavailable, session and cart will not persist");
        Rc::new(MemoryStorage::new())
    }
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let storage = browser_storage();
    let api = ApiClient::http(config.clone());
    let cart = Cart::load(storage.as_ref());

    let ctx = AppContext::new(config, api, storage);
    let store = ShopStore::new(ShopState::with_cart(cart));
    provide_context(ctx);
    provide_context(store);

    load_catalog(ctx, store);

    // Expired sessions drop back to the login screen
    let ticker = Interval::new(SESSION_CHECK_MS, move || {
        if ctx.check_session() && ctx.route.get_untracked().is_admin() {
            ctx.navigate(Route::Login);
        }
    });
    let ticker = StoredValue::new_local(Some(ticker));
    on_cleanup(move || ticker.set_value(None));

    // Only crossing between storefront, login and admin rebuilds the tree
    let screen = Memo::new(move |_| {
        let authenticated = ctx.is_authenticated();
        match ctx.route.get() {
            Route::Admin(_) | Route::Login if authenticated => Screen::Admin,
            Route::Admin(_) | Route::Login => Screen::Login,
            shop => Screen::Shop(shop),
        }
    });

    let view = move || match screen.get() {
        Screen::Login => view! { <LoginForm /> }.into_any(),
        Screen::Admin => view! { <AdminShell /> }.into_any(),
        Screen::Shop(route) => view! {
            <div class="shop-layout">
                <ShopHeader />
                <main class="shop-content">
                    {match route {
                        Route::LabFinder => view! { <LabFinderPage /> }.into_any(),
                        Route::Packages => view! { <PackagesPage /> }.into_any(),
                        Route::Cart => view! { <CartPage /> }.into_any(),
                        Route::Blog => view! { <BlogListPage /> }.into_any(),
                        Route::BlogPost(key) => view! { <BlogPostPage key /> }.into_any(),
                        _ => view! { <HomePage /> }.into_any(),
                    }}
                </main>
                <footer class="shop-footer">"© DiagLab Diagnostics"</footer>
            </div>
        }
        .into_any(),
    };

    view! { <div class="app-root">{view}</div> }
}
