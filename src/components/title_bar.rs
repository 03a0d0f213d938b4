//! Admin Title Bar Component
//!
//! Signed-in user, link back to the storefront and logout.

use leptos::prelude::*;

use super::log_panel::LogPanel;
use crate::context::use_app_context;
use crate::route::Route;

#[component]
pub fn TitleBar() -> impl IntoView {
    let ctx = use_app_context();
    let (show_logs, set_show_logs) = signal(false);

    let user_name = move || {
        ctx.session.with(|s| {
            s.user()
                .map(|u| if u.name.is_empty() { u.email.clone() } else { u.name.clone() })
                .unwrap_or_default()
        })
    };

    view! {
        <div class="admin-titlebar">
            <span class="titlebar-title">"DiagLab Admin"</span>
            <div class="titlebar-controls">
                <span class="titlebar-user">{user_name}</span>
                <button class="titlebar-btn" title="Recent log" on:click=move |_| set_show_logs.update(|v| *v = !*v)>
                    "Logs"
                </button>
                <button class="titlebar-btn" title="Open storefront" on:click=move |_| ctx.navigate(Route::Home)>
                    "Storefront"
                </button>
                <button class="titlebar-btn logout" title="Sign out" on:click=move |_| ctx.logout()>
                    "Logout"
                </button>
            </div>
            <Show when=move || show_logs.get()>
                <LogPanel on_close=move |_: ()| set_show_logs.set(false) />
            </Show>
        </div>
    }
}
