//! Resource Page
//!
//! The management screen every admin section mounts: search box, table with
//! selection and per-row actions, pagination, bulk delete, the create/edit
//! modal and notices. Generic over the record type.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::form_modal::{FormModal, ReferenceOptions};
use super::notice_list::NoticeList;
use crate::collection::{Collection, CollectionState};
use crate::context::use_app_context;
use crate::form::{FieldKind, FieldValue};
use crate::lifetime::Lifetime;
use crate::models::Resource;

type Controller<R> = Collection<R, RwSignal<CollectionState<R>>>;

const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// Management page for `R` under the given heading
pub fn resource_page<R: Resource>(title: &'static str) -> impl IntoView {
    let ctx = use_app_context();
    let (page_size, debounce_ms) = ctx.config.with_value(|c| (c.page_size, c.search_debounce_ms));
    let lifetime = Lifetime::for_component();

    let state = RwSignal::new(CollectionState::<R>::new(page_size));
    let ctl: StoredValue<Controller<R>, LocalStorage> =
        StoredValue::new_local(Collection::new(ctx.api().resource::<R>(), state, lifetime.clone()));
    let references = RwSignal::new(ReferenceOptions::new());
    let search_input = RwSignal::new(String::new());
    let pending_search: StoredValue<Option<Timeout>, LocalStorage> = StoredValue::new_local(None);

    let refresh = move || {
        let c = ctl.get_value();
        spawn_local(async move {
            let _ = c.fetch_list().await;
        });
    };

    // Initial load: the list plus options for reference selects
    refresh();
    for spec in R::schema() {
        if let FieldKind::Reference(endpoint) = spec.kind {
            let api = ctx.api();
            let lifetime = lifetime.clone();
            spawn_local(async move {
                match lifetime.run(api.reference_options(endpoint)).await {
                    Ok(options) => references.update(|r| {
                        r.insert(endpoint.to_string(), options);
                    }),
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => tracing::warn!("Options for {} unavailable: {}", endpoint, e),
                }
            });
        }
    }

    let on_search = move |value: String| {
        search_input.set(value.clone());
        // Replacing the pending timeout drops, and so cancels, the previous one
        pending_search.set_value(Some(Timeout::new(debounce_ms, move || {
            ctl.with_value(|c| c.set_search(value));
            if R::SERVER_SEARCH {
                refresh();
            }
        })));
    };

    let toggle = move |id: R::Id| {
        let c = ctl.get_value();
        spawn_local(async move {
            let _ = c.toggle_status(id).await;
        });
    };
    let delete = move |id: R::Id| {
        let c = ctl.get_value();
        spawn_local(async move {
            let _ = c.delete(id).await;
        });
    };
    let delete_selected = move |_| {
        let c = ctl.get_value();
        spawn_local(async move {
            let _ = c.delete_selected().await;
        });
    };
    let submit = move |_: ()| {
        let c = ctl.get_value();
        let values = state.with_untracked(|s| s.form.clone());
        spawn_local(async move {
            let _ = c.submit(values).await;
        });
    };
    let on_change = move |(name, value): (String, FieldValue)| {
        state.update(|s| {
            match value {
                FieldValue::Text(text) => s.form.set_text(&name, text),
                FieldValue::Flag(flag) => s.form.set_flag(&name, flag),
                FieldValue::File(file) => s.form.set_file(&name, file),
            }
            s.form_errors.remove(&name);
        });
    };

    let page_view = Memo::new(move |_| state.with(|s| s.page_view()));
    let dialog_open = Memo::new(move |_| state.with(|s| s.dialog_open));
    let selected_count = Memo::new(move |_| state.with(|s| s.selected.len()));
    let all_visible_selected = move || {
        state.with(|s| {
            let view = page_view.get();
            !view.rows.is_empty() && view.rows.iter().all(|r| s.selected.contains(&r.id()))
        })
    };

    let rows = move || {
        page_view
            .get()
            .rows
            .into_iter()
            .map(|record| {
                let id = record.id();
                let active = record.is_active();
                let checked = {
                    let id = id.clone();
                    move || state.with(|s| s.selected.contains(&id))
                };
                let (toggle_id, delete_id, select_id) = (id.clone(), id.clone(), id);
                let edit_record = record.clone();
                view! {
                    <tr class=if active { "row" } else { "row inactive" }>
                        <td>
                            <input
                                type="checkbox"
                                prop:checked=checked
                                on:change=move |_| ctl.with_value(|c| c.toggle_select(select_id.clone()))
                            />
                        </td>
                        {record.cells().into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                        <td class="row-actions">
                            <button
                                class=if active { "status-btn on" } else { "status-btn off" }
                                on:click=move |_| toggle(toggle_id.clone())
                            >
                                {if active { "Deactivate" } else { "Activate" }}
                            </button>
                            <button on:click=move |_| ctl.with_value(|c| c.open_edit(edit_record.clone()))>"Edit"</button>
                            <button class="danger" on:click=move |_| delete(delete_id.clone())>"Delete"</button>
                        </td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <section class="resource-page">
            <header class="resource-header">
                <h1>{title}</h1>
                <div class="resource-toolbar">
                    <input
                        type="search"
                        placeholder=format!("Search {}...", R::LABEL.to_lowercase())
                        prop:value=move || search_input.get()
                        on:input=move |ev| on_search(event_target_value(&ev))
                    />
                    <Show when=move || { selected_count.get() > 0 }>
                        <button class="danger" on:click=delete_selected>
                            {move || format!("Delete selected ({})", selected_count.get())}
                        </button>
                    </Show>
                    <button class="primary" on:click=move |_| ctl.with_value(|c| c.open_create())>
                        {format!("Add {}", R::LABEL)}
                    </button>
                </div>
            </header>

            <NoticeList
                notices=Signal::derive(move || state.with(|s| s.notices.items().to_vec()))
                on_dismiss=move |id: u64| ctl.with_value(|c| c.dismiss_notice(id))
            />

            <table class="resource-table">
                <thead>
                    <tr>
                        <th>
                            <input
                                type="checkbox"
                                prop:checked=all_visible_selected
                                on:change=move |ev| {
                                    if event_target_checked(&ev) {
                                        ctl.with_value(|c| c.select_all_visible());
                                    } else {
                                        ctl.with_value(|c| c.clear_selection());
                                    }
                                }
                            />
                        </th>
                        {R::COLUMNS.iter().map(|(header, _)| view! { <th>{*header}</th> }).collect_view()}
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    <Show
                        when=move || !state.with(|s| s.loading && s.items.is_empty())
                        fallback=|| view! { <tr><td class="table-message" colspan="99">"Loading..."</td></tr> }
                    >
                        <Show
                            when=move || { page_view.with(|v| v.filtered > 0) }
                            fallback=|| view! { <tr><td class="table-message" colspan="99">"No records found"</td></tr> }
                        >
                            {rows}
                        </Show>
                    </Show>
                </tbody>
            </table>

            <footer class="pagination">
                <span>{move || page_view.with(|v| v.summary())}</span>
                <button
                    disabled=move || page_view.with(|v| v.page <= 1)
                    on:click=move |_| ctl.with_value(|c| c.set_page(page_view.with_untracked(|v| v.page) - 1))
                >
                    "Previous"
                </button>
                <span>{move || page_view.with(|v| format!("Page {} of {}", v.page, v.page_count))}</span>
                <button
                    disabled=move || page_view.with(|v| v.page >= v.page_count)
                    on:click=move |_| ctl.with_value(|c| c.set_page(page_view.with_untracked(|v| v.page) + 1))
                >
                    "Next"
                </button>
                <select
                    class="page-size"
                    prop:value=move || state.with(|s| s.page_size.to_string())
                    on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse::<usize>() {
                            ctl.with_value(|c| c.set_page_size(size));
                        }
                    }
                >
                    {PAGE_SIZES
                        .iter()
                        .map(|n| view! { <option value=n.to_string()>{format!("{} / page", n)}</option> })
                        .collect_view()}
                </select>
            </footer>

            <Show when=move || dialog_open.get()>
                <FormModal
                    title=Signal::derive(move || {
                        let verb = if state.with(|s| s.editing.is_some()) { "Edit" } else { "Add" };
                        format!("{} {}", verb, R::LABEL)
                    })
                    schema=R::schema()
                    form=Signal::derive(move || state.with(|s| s.form.clone()))
                    errors=Signal::derive(move || state.with(|s| s.form_errors.clone()))
                    submit_error=Signal::derive(move || state.with(|s| s.submit_error.clone()))
                    submitting=Signal::derive(move || state.with(|s| s.submitting))
                    options=references
                    on_change=on_change
                    on_submit=submit
                    on_cancel=move |_: ()| ctl.with_value(|c| c.close_dialog())
                />
            </Show>
        </section>
    }
}
