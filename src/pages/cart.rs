//! Cart page: quantities, coupon, totals

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::shop::format_price;
use crate::api::ListQuery;
use crate::cart::{Cart, CartLine};
use crate::context::{use_app_context, AppContext};
use crate::models::Coupon;
use crate::route::Route;
use crate::store::{store_update_cart, use_shop_store, ShopStateStoreFields, ShopStore};

fn edit_cart(store: ShopStore, ctx: AppContext, f: impl FnOnce(&mut Cart)) {
    store_update_cart(&store, ctx.storage().as_ref(), f);
}

#[component]
pub fn CartPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_shop_store();
    let (code, set_code) = signal(String::new());
    let (coupon_message, set_coupon_message) = signal::<Option<(bool, String)>>(None);

    let apply_coupon = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let wanted = code.get_untracked().trim().to_uppercase();
        if wanted.is_empty() {
            return;
        }
        let api = ctx.public_api();
        spawn_local(async move {
            let coupons = match api.resource::<Coupon>().list(&ListQuery::default()).await {
                Ok(coupons) => coupons,
                Err(e) => {
                    set_coupon_message.set(Some((false, e.user_message())));
                    return;
                }
            };
            let Some(coupon) = coupons.into_iter().find(|c| c.code.to_uppercase() == wanted) else {
                set_coupon_message.set(Some((false, "Unknown coupon code".to_string())));
                return;
            };
            let today = Utc::now().date_naive();
            let mut outcome = None;
            edit_cart(store, ctx, |cart| outcome = Some(cart.apply_coupon(&coupon, today)));
            match outcome {
                Some(Ok(saved)) => set_coupon_message.set(Some((true, format!("You save {}", format_price(saved))))),
                Some(Err(rejected)) => set_coupon_message.set(Some((false, rejected.to_string()))),
                None => {}
            }
        });
    };

    let line_view = move |line: CartLine| {
        let id = line.item_id.clone();
        let (minus_id, plus_id, remove_id) = (id.clone(), id.clone(), id);
        let quantity = line.quantity;
        view! {
            <tr>
                <td>
                    <div class="line-name">{line.name.clone()}</div>
                    {line.lab_name.clone().map(|l| view! { <div class="lab-name">{l}</div> })}
                </td>
                <td>{format_price(line.unit_price)}</td>
                <td class="qty">
                    <button on:click=move |_| {
                        let id = minus_id.clone();
                        edit_cart(store, ctx, move |cart| cart.set_quantity(&id, quantity.saturating_sub(1)));
                    }>"-"</button>
                    <span>{quantity}</span>
                    <button on:click=move |_| {
                        let id = plus_id.clone();
                        edit_cart(store, ctx, move |cart| cart.set_quantity(&id, quantity + 1));
                    }>"+"</button>
                </td>
                <td>{format_price(line.line_total())}</td>
                <td>
                    <button class="link" on:click=move |_| {
                        let id = remove_id.clone();
                        edit_cart(store, ctx, move |cart| cart.remove(&id));
                    }>"Remove"</button>
                </td>
            </tr>
        }
    };

    let cart = move || store.cart().get();

    view! {
        <div class="cart-page">
            <h1>"Your cart"</h1>
            <Show
                when=move || store.cart().with(|c| !c.is_empty())
                fallback=move || view! {
                    <p class="empty">"Your cart is empty."</p>
                    <button class="primary" on:click=move |_| ctx.navigate(Route::Packages)>"Browse packages"</button>
                }
            >
                <table class="cart-table">
                    <thead>
                        <tr><th>"Package"</th><th>"Price"</th><th>"Qty"</th><th>"Total"</th><th></th></tr>
                    </thead>
                    <tbody>{move || cart().lines.into_iter().map(line_view).collect_view()}</tbody>
                </table>

                <form class="coupon-form" on:submit=apply_coupon>
                    <input
                        type="text"
                        placeholder="Coupon code"
                        prop:value=move || code.get()
                        on:input=move |ev| set_code.set(event_target_value(&ev))
                    />
                    <button type="submit">"Apply"</button>
                    {move || store.cart().with(|c| c.coupon.as_ref().map(|cp| cp.code.clone())).map(|applied| view! {
                        <span class="coupon-applied">{applied}</span>
                        <button type="button" class="link" on:click=move |_| {
                            set_coupon_message.set(None);
                            edit_cart(store, ctx, |cart| cart.remove_coupon());
                        }>"Remove"</button>
                    })}
                </form>
                {move || coupon_message.get().map(|(ok, msg)| view! {
                    <p class=if ok { "coupon-message ok" } else { "coupon-message error" }>{msg}</p>
                })}

                <dl class="cart-totals">
                    <dt>"Subtotal"</dt><dd>{move || format_price(cart().subtotal())}</dd>
                    <dt>"Discount"</dt><dd>{move || format!("-{}", format_price(cart().discount()))}</dd>
                    <dt class="grand">"Total"</dt><dd class="grand">{move || format_price(cart().total())}</dd>
                </dl>
                <button class="link" on:click=move |_| edit_cart(store, ctx, |cart| cart.clear())>"Empty cart"</button>
            </Show>
        </div>
    }
}
