//! Log Panel Component
//!
//! Recent log lines from the console logger's buffer, for support sessions
//! where the browser devtools are out of reach.

use console_logger::{clear_recent, recent_lines, LogLine};
use leptos::prelude::*;

#[component]
pub fn LogPanel(#[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let lines = RwSignal::new(recent_lines());
    let refresh = move |_| lines.set(recent_lines());
    let clear = move |_| {
        clear_recent();
        lines.set(Vec::new());
    };

    let row = |line: LogLine| {
        let class = format!("log-line level-{}", line.level.as_str().to_lowercase());
        view! {
            <li class=class>
                <span class="log-time">{line.at.format("%H:%M:%S").to_string()}</span>
                <span class="log-level">{line.level.as_str()}</span>
                <span class="log-message">{line.message}</span>
            </li>
        }
    };

    view! {
        <aside class="log-panel">
            <header>
                <span>"Recent log"</span>
                <button on:click=refresh>"Refresh"</button>
                <button on:click=clear>"Clear"</button>
                <button on:click=move |_| on_close.run(())>"×"</button>
            </header>
            <ul>
                // Newest first
                {move || lines.get().into_iter().rev().map(row).collect_view()}
            </ul>
        </aside>
    }
}
