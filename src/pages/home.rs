//! Home page: hero banners and the category grid

use leptos::prelude::*;

use super::shop::format_price;
use crate::context::use_app_context;
use crate::markdown::resolve_media_url;
use crate::models::{Banner, Category};
use crate::route::Route;
use crate::store::{active_banners, active_packages, use_shop_store, ShopStateStoreFields};

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_shop_store();
    let media = ctx.config.with_value(|c| c.media_base().to_string());

    let banners = {
        let media = media.clone();
        move || {
            let shown: Vec<Banner> = store.banners().with(|all| active_banners(all, "home").into_iter().cloned().collect());
            shown
                .into_iter()
                .map(|b| {
                    let src = b.image.as_deref().map(|i| resolve_media_url(i, &media)).unwrap_or_default();
                    view! {
                        <div class="hero-banner">
                            <img src=src alt=b.title.clone() />
                            <div class="hero-text">
                                <h2>{b.title}</h2>
                                <p>{b.subtitle.unwrap_or_default()}</p>
                            </div>
                        </div>
                    }
                })
                .collect_view()
        }
    };

    let categories = move || {
        let mut shown: Vec<Category> = store.categories().with(|all| all.iter().filter(|c| c.is_active).cloned().collect());
        shown.sort_by_key(|c| c.sort_order);
        shown
            .into_iter()
            .map(|c| {
                let src = c.image.as_deref().map(|i| resolve_media_url(i, &media)).unwrap_or_default();
                view! {
                    <button class="category-card" on:click=move |_| ctx.navigate(Route::Packages)>
                        <img src=src alt="" />
                        <span>{c.name}</span>
                    </button>
                }
            })
            .collect_view()
    };

    let popular = move || {
        let shown: Vec<(String, f64)> = store.packages().with(|all| {
            active_packages(all, None).into_iter().take(4).map(|p| (p.name.clone(), p.selling_price())).collect()
        });
        shown
            .into_iter()
            .map(|(name, price)| {
                view! {
                    <div class="package-card compact">
                        <h3>{name}</h3>
                        <span class="price">{format_price(price)}</span>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <div class="home-page">
            <section class="hero">{banners}</section>
            <section>
                <h2>"Browse by category"</h2>
                <div class="category-grid">{categories}</div>
            </section>
            <section>
                <h2>"Popular packages"</h2>
                <div class="package-grid">{popular}</div>
                <button class="primary" on:click=move |_| ctx.navigate(Route::Packages)>"View all packages"</button>
            </section>
            <section class="cta">
                <h2>"Find a lab near you"</h2>
                <button on:click=move |_| ctx.navigate(Route::LabFinder)>"Search labs"</button>
            </section>
        </div>
    }
}
