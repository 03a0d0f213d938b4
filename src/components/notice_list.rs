//! Notice List Component
//!
//! Stack of dismissible success/error messages.

use leptos::prelude::*;

use crate::notice::Notice;

#[component]
pub fn NoticeList(
    #[prop(into)] notices: Signal<Vec<Notice>>,
    #[prop(into)] on_dismiss: Callback<u64>,
) -> impl IntoView {
    view! {
        <div class="notice-stack">
            <For
                each=move || notices.get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div class=notice.level.css_class() role="status">
                            <span class="notice-text">{notice.message}</span>
                            <button class="notice-close" on:click=move |_| on_dismiss.run(id)>"×"</button>
                        </div>
                    }
                }
            />
        </div>
    }
}
