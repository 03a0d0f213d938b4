//! Login Form Component
//!
//! Gate in front of the admin area.

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::auth::Credentials;
use crate::context::use_app_context;
use crate::error::ApiError;
use crate::route::{AdminSection, Route};

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let credentials = Credentials::new(email.get_untracked(), password.get_untracked());
        let client = ctx.public_api();
        set_busy.set(true);
        set_error.set(None);

        spawn_local(async move {
            // Log in on a copy; the shared store only changes on success
            let mut session = ctx.session.get_untracked();
            let outcome = session.login(&client, &credentials, Utc::now()).await;
            set_busy.set(false);
            match outcome {
                Ok(_) => {
                    ctx.session.set(session);
                    set_password.set(String::new());
                    // Stay on the section that asked for a login, if any
                    if !ctx.route.get_untracked().is_admin() {
                        ctx.navigate(Route::Admin(AdminSection::Categories));
                    }
                }
                Err(ApiError::Validation(fields)) => {
                    set_error.set(fields.into_values().next());
                }
                Err(e) => {
                    tracing::warn!("Login failed: {}", e);
                    set_error.set(Some(e.user_message()));
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <form class="login-card" on:submit=on_submit>
                <h1>"Admin sign in"</h1>
                <label>
                    <span>"Email"</span>
                    <input
                        type="email"
                        autocomplete="username"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    <span>"Password"</span>
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
                {move || error.get().map(|msg| view! { <p class="submit-error">{msg}</p> })}
                <button type="submit" class="primary" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                </button>
                <button type="button" class="link" on:click=move |_| ctx.navigate(Route::Home)>
                    "Back to store"
                </button>
            </form>
        </div>
    }
}
