//! Package listing with add-to-cart

use leptos::prelude::*;

use super::shop::format_price;
use crate::context::use_app_context;
use crate::models::Item;
use crate::store::{active_packages, store_add_to_cart, use_shop_store, ShopStateStoreFields};

#[component]
pub fn PackagesPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_shop_store();
    let (category, set_category) = signal(String::new());

    let category_options = move || {
        store.categories().with(|all| {
            all.iter()
                .filter(|c| c.is_active)
                .map(|c| view! { <option value=c.id.clone()>{c.name.clone()}</option> })
                .collect_view()
        })
    };

    let cards = move || {
        let category = category.get();
        let items: Vec<Item> =
            store.packages().with(|all| active_packages(all, Some(category.as_str())).into_iter().cloned().collect());
        if items.is_empty() {
            let message = if store.catalog_loaded().get() { "No packages in this category." } else { "Loading packages..." };
            return view! { <p class="empty">{message}</p> }.into_any();
        }
        items
            .into_iter()
            .map(|item| {
                let discounted = item.selling_price() < item.price;
                let in_cart = {
                    let id = item.id.clone();
                    move || store.cart().with(|c| c.lines.iter().any(|l| l.item_id == id))
                };
                let (name, lab, tests) = (item.name.clone(), item.lab_name.clone(), item.tests_included);
                let (price, selling) = (item.price, item.selling_price());
                let add = move |_| store_add_to_cart(&store, ctx.storage().as_ref(), &item);
                view! {
                    <div class="package-card">
                        <h3>{name}</h3>
                        {lab.map(|l| view! { <p class="lab-name">{l}</p> })}
                        {tests.map(|n| view! { <p class="tests">{format!("{} tests included", n)}</p> })}
                        <div class="price-row">
                            <span class="price">{format_price(selling)}</span>
                            {discounted.then(|| view! { <span class="price-was">{format_price(price)}</span> })}
                        </div>
                        <button class="primary" on:click=add>
                            {move || if in_cart() { "Add another" } else { "Add to cart" }}
                        </button>
                    </div>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <div class="packages-page">
            <h1>"Health packages"</h1>
            <select prop:value=move || category.get() on:change=move |ev| set_category.set(event_target_value(&ev))>
                <option value="">"All categories"</option>
                {category_options}
            </select>
            <div class="package-grid">{cards}</div>
        </div>
    }
}
