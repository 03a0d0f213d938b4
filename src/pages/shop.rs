//! Storefront chrome and catalog loading

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{use_app_context, AppContext};
use crate::route::Route;
use crate::store::{fetch_catalog, use_shop_store, ShopStateStoreFields, ShopStore};

/// Fetch everything the public pages show, once, in the background
pub fn load_catalog(ctx: AppContext, store: ShopStore) {
    let api = ctx.public_api();
    spawn_local(async move {
        fetch_catalog(&api, &store).await;
    });
}

#[component]
pub fn ShopHeader() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_shop_store();
    let cart_count = move || store.cart().with(|c| c.count());

    view! {
        <header class="shop-header">
            <button class="brand" on:click=move |_| ctx.navigate(Route::Home)>"DiagLab"</button>
            <nav class="shop-nav">
                {Route::SHOP_NAV
                    .iter()
                    .map(|(label, route)| {
                        let target = route.clone();
                        let active = {
                            let route = route.clone();
                            move || ctx.route.with(|r| *r == route)
                        };
                        view! {
                            <button
                                class=move || if active() { "nav-link active" } else { "nav-link" }
                                on:click=move |_| ctx.navigate(target.clone())
                            >
                                {*label}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
            <button class="cart-link" on:click=move |_| ctx.navigate(Route::Cart)>
                "Cart (" {cart_count} ")"
            </button>
            <button class="nav-link admin-link" on:click=move |_| ctx.navigate(Route::Login)>"Admin"</button>
        </header>
    }
}

/// Price with the rupee sign and no trailing zeros for whole amounts
pub fn format_price(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("₹{}", amount as i64)
    } else {
        format!("₹{:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1499.0), "₹1499");
        assert_eq!(format_price(99.5), "₹99.50");
    }
}
