//! Form Modal Component
//!
//! Renders a field schema as a modal form. Values, errors and option lists
//! come in as signals; every edit goes back out through `on_change`.

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::api::FileUpload;
use crate::error::FieldErrors;
use crate::form::{FieldKind, FieldSpec, FieldValue, FormValues};

/// Options for `FieldKind::Reference` fields, keyed by endpoint
pub type ReferenceOptions = BTreeMap<String, Vec<(String, String)>>;

/// Read the first selected file of an `<input type="file">`
async fn read_file(input: web_sys::HtmlInputElement) -> Option<FileUpload> {
    let file = input.files()?.get(0)?;
    let buffer = match JsFuture::from(file.array_buffer()).await {
        Ok(buffer) => buffer,
        Err(e) => {
            tracing::warn!("Could not read {}: {:?}", file.name(), e);
            return None;
        }
    };
    Some(FileUpload {
        file_name: file.name(),
        mime: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

#[component]
fn FormField(
    spec: FieldSpec,
    form: Signal<FormValues>,
    errors: Signal<FieldErrors>,
    options: Signal<ReferenceOptions>,
    on_change: Callback<(String, FieldValue)>,
) -> impl IntoView {
    let name = spec.name;
    let text = move || form.with(|f| f.text(name));
    let set_text = move |value: String| on_change.run((name.to_string(), FieldValue::Text(value)));
    let input_type = match spec.kind {
        FieldKind::Email => "email",
        FieldKind::Date => "date",
        FieldKind::Number { .. } => "number",
        _ => "text",
    };

    let control = match spec.kind {
        FieldKind::TextArea => view! {
            <textarea rows="4" prop:value=text on:input=move |ev| set_text(event_target_value(&ev))></textarea>
        }
        .into_any(),
        FieldKind::Checkbox => view! {
            <input
                type="checkbox"
                prop:checked=move || form.with(|f| f.flag(name))
                on:change=move |ev| on_change.run((name.to_string(), FieldValue::Flag(event_target_checked(&ev))))
            />
        }
        .into_any(),
        FieldKind::Select(choices) => view! {
            <select prop:value=text on:change=move |ev| set_text(event_target_value(&ev))>
                {choices.iter().map(|(value, label)| view! { <option value=*value>{*label}</option> }).collect_view()}
            </select>
        }
        .into_any(),
        FieldKind::Reference(endpoint) => view! {
            <select prop:value=text on:change=move |ev| set_text(event_target_value(&ev))>
                <option value="">"-- Select --"</option>
                {move || {
                    options
                        .with(|o| o.get(endpoint).cloned().unwrap_or_default())
                        .into_iter()
                        .map(|(id, label)| view! { <option value=id>{label}</option> })
                        .collect_view()
                }}
            </select>
        }
        .into_any(),
        FieldKind::Image => {
            let attached = move || {
                form.with(|f| match f.get(name) {
                    Some(FieldValue::File(file)) => Some(file.file_name.clone()),
                    Some(FieldValue::Text(url)) if !url.is_empty() => Some(url.clone()),
                    _ => None,
                })
            };
            view! {
                <input
                    type="file"
                    accept="image/*,application/pdf"
                    on:change=move |ev| {
                        let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
                            return;
                        };
                        spawn_local(async move {
                            if let Some(file) = read_file(input).await {
                                on_change.run((name.to_string(), FieldValue::File(file)));
                            }
                        });
                    }
                />
                {move || attached().map(|current| view! { <span class="file-current">{current}</span> })}
            }
            .into_any()
        }
        _ => view! {
            <input type=input_type prop:value=text on:input=move |ev| set_text(event_target_value(&ev)) />
        }
        .into_any(),
    };

    view! {
        <label class=move || if errors.with(|e| e.contains_key(name)) { "form-field invalid" } else { "form-field" }>
            <span class="form-label">
                {spec.label}
                {spec.required.then_some(view! { <span class="required">"*"</span> })}
            </span>
            {control}
            {move || errors.with(|e| e.get(name).cloned()).map(|msg| view! { <span class="field-error">{msg}</span> })}
        </label>
    }
}

#[component]
pub fn FormModal(
    #[prop(into)] title: Signal<String>,
    schema: &'static [FieldSpec],
    #[prop(into)] form: Signal<FormValues>,
    #[prop(into)] errors: Signal<FieldErrors>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
    #[prop(into)] options: Signal<ReferenceOptions>,
    #[prop(into)] on_change: Callback<(String, FieldValue)>,
    #[prop(into)] on_submit: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="modal-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="modal" on:click=|ev| ev.stop_propagation()>
                <h2>{move || title.get()}</h2>
                <form on:submit=move |ev: web_sys::SubmitEvent| {
                    ev.prevent_default();
                    on_submit.run(());
                }>
                    {schema
                        .iter()
                        .map(|spec| view! { <FormField spec=*spec form errors options on_change /> })
                        .collect_view()}
                    {move || submit_error.get().map(|msg| view! { <p class="submit-error">{msg}</p> })}
                    <div class="modal-actions">
                        <button type="button" on:click=move |_| on_cancel.run(())>"Cancel"</button>
                        <button type="submit" class="primary" disabled=move || submitting.get()>
                            {move || if submitting.get() { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
