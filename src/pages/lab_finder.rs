//! Lab finder: pick a city, type part of a name

use leptos::prelude::*;

use crate::models::Lab;
use crate::store::{find_labs, use_shop_store, ShopStateStoreFields};

#[component]
pub fn LabFinderPage() -> impl IntoView {
    let store = use_shop_store();
    let (city, set_city) = signal(String::new());
    let (query, set_query) = signal(String::new());

    let cities = move || {
        store.cities().with(|all| {
            let mut shown: Vec<_> = all.iter().filter(|c| c.is_active).cloned().collect();
            shown.sort_by(|a, b| a.name.cmp(&b.name));
            shown
                .into_iter()
                .map(|c| view! { <option value=c.id>{c.name}</option> })
                .collect_view()
        })
    };

    let results = move || {
        let city = city.get();
        let query = query.get();
        let found: Vec<Lab> =
            store.labs().with(|labs| find_labs(labs, Some(city.as_str()), &query).into_iter().cloned().collect());
        if found.is_empty() {
            return view! { <p class="empty">"No labs match your search."</p> }.into_any();
        }
        found
            .into_iter()
            .map(|lab| {
                view! {
                    <div class="lab-card">
                        <h3>{lab.name}</h3>
                        <p>{lab.address}</p>
                        {lab.accreditation.map(|a| view! { <span class="badge">{a}</span> })}
                        {lab.home_collection.then_some(view! { <span class="badge">"Home collection"</span> })}
                        {lab.phone.map(|p| view! { <a href=format!("tel:{}", p)>{p.clone()}</a> })}
                    </div>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <div class="lab-finder">
            <h1>"Find a lab"</h1>
            <div class="filters">
                <select prop:value=move || city.get() on:change=move |ev| set_city.set(event_target_value(&ev))>
                    <option value="">"All cities"</option>
                    {cities}
                </select>
                <input
                    type="search"
                    placeholder="Lab name or area"
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
            </div>
            <div class="lab-list">{results}</div>
        </div>
    }
}
