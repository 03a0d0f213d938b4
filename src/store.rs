//! Storefront State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Holds the
//! public catalog as last fetched and the visitor's cart.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::{ApiClient, ListQuery};
use crate::cart::Cart;
use crate::error::ApiResult;
use crate::models::{Banner, Blog, Category, City, Item, Lab, Resource};
use crate::storage::StorageAdapter;

/// Public catalog plus cart, with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct ShopState {
    pub banners: Vec<Banner>,
    pub categories: Vec<Category>,
    pub labs: Vec<Lab>,
    pub cities: Vec<City>,
    pub packages: Vec<Item>,
    pub blogs: Vec<Blog>,
    /// Set once the start-up catalog requests have all settled
    pub catalog_loaded: bool,
    pub cart: Cart,
}

impl ShopState {
    pub fn with_cart(cart: Cart) -> Self {
        Self {
            cart,
            ..Default::default()
        }
    }
}

pub type ShopStore = Store<ShopState>;

pub fn use_shop_store() -> ShopStore {
    expect_context::<ShopStore>()
}

// ========================
// Catalog loading
// ========================

fn keep<R: Resource>(result: ApiResult<Vec<R>>) -> Option<Vec<R>> {
    match result {
        Ok(records) => Some(records),
        Err(e) => {
            tracing::warn!("Storefront {} list unavailable: {}", R::LABEL, e);
            None
        }
    }
}

/// Load the public lists in parallel. A list that fails keeps its previous contents.
pub async fn fetch_catalog(api: &ApiClient, store: &ShopStore) {
    let query = ListQuery::default();
    let (banner_api, category_api, lab_api) =
        (api.resource::<Banner>(), api.resource::<Category>(), api.resource::<Lab>());
    let (city_api, item_api, blog_api) = (api.resource::<City>(), api.resource::<Item>(), api.resource::<Blog>());
    let (banners, categories, labs, cities, packages, blogs) = futures::join!(
        banner_api.list(&query),
        category_api.list(&query),
        lab_api.list(&query),
        city_api.list(&query),
        item_api.list(&query),
        blog_api.list(&query),
    );

    if let Some(v) = keep(banners) {
        store.banners().set(v);
    }
    if let Some(v) = keep(categories) {
        store.categories().set(v);
    }
    if let Some(v) = keep(labs) {
        store.labs().set(v);
    }
    if let Some(v) = keep(cities) {
        store.cities().set(v);
    }
    if let Some(v) = keep(packages) {
        store.packages().set(v);
    }
    if let Some(v) = keep(blogs) {
        store.blogs().set(v);
    }
    store.catalog_loaded().set(true);
}

// ========================
// Cart helpers
// ========================

/// Apply `f` to the cart and persist the result
pub fn store_update_cart(store: &ShopStore, storage: &dyn StorageAdapter, f: impl FnOnce(&mut Cart)) {
    let cart = store.cart();
    let mut guard = cart.write();
    f(&mut *guard);
    if let Err(e) = guard.save(storage) {
        tracing::warn!("Cart not saved: {}", e);
    }
}

pub fn store_add_to_cart(store: &ShopStore, storage: &dyn StorageAdapter, item: &Item) {
    store_update_cart(store, storage, |cart| cart.add(item));
    tracing::debug!("Added {} to cart", item.name);
}

// ========================
// Catalog queries
// ========================

/// Active banners for one placement, in sort order
pub fn active_banners<'a>(banners: &'a [Banner], placement: &str) -> Vec<&'a Banner> {
    let mut shown: Vec<&Banner> = banners
        .iter()
        .filter(|b| b.is_active && b.placement.as_deref().unwrap_or("home") == placement)
        .collect();
    shown.sort_by_key(|b| b.sort_order);
    shown
}

/// Lab finder: optional city, then a case-insensitive name/address match
pub fn find_labs<'a>(labs: &'a [Lab], city: Option<&str>, query: &str) -> Vec<&'a Lab> {
    let needle = query.trim().to_lowercase();
    labs.iter()
        .filter(|l| l.is_active)
        .filter(|l| matches_filter(city, l.city.as_deref()))
        .filter(|l| {
            needle.is_empty()
                || l.name.to_lowercase().contains(&needle)
                || l.address.to_lowercase().contains(&needle)
        })
        .collect()
}

// An unset or empty filter matches everything
fn matches_filter(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(wanted) => value == Some(wanted),
    }
}

/// Packages on sale, optionally within one category, cheapest first
pub fn active_packages<'a>(items: &'a [Item], category: Option<&str>) -> Vec<&'a Item> {
    let mut shown: Vec<&Item> = items
        .iter()
        .filter(|i| i.is_active)
        .filter(|i| matches_filter(category, i.category.as_deref()))
        .collect();
    shown.sort_by(|a, b| a.selling_price().total_cmp(&b.selling_price()));
    shown
}

/// Published posts only
pub fn published_blogs(blogs: &[Blog]) -> Vec<&Blog> {
    blogs.iter().filter(|b| b.status).collect()
}

/// Posts are addressed by slug when they have one, else by id
pub fn find_blog<'a>(blogs: &'a [Blog], key: &str) -> Option<&'a Blog> {
    blogs
        .iter()
        .find(|b| b.slug.as_deref() == Some(key))
        .or_else(|| blogs.iter().find(|b| b.id == key))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::cart::CART_KEY;
    use crate::config::AppConfig;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_fetch_catalog_fills_lists_and_keeps_failed_one() {
        let transport = ScriptedTransport::new();
        transport
            .reply(200, r#"[{"_id":"bn1","title":"Monsoon offer","isActive":true}]"#)
            .reply(200, r#"{"data":[{"_id":"c1","name":"Blood","isActive":true}]}"#)
            .reply(500, r#"{"message":"labs down"}"#)
            .reply(200, r#"[{"_id":"blr","name":"Bengaluru"}]"#)
            .reply(200, r#"[{"_id":"p1","name":"Full Body","price":999,"isActive":true}]"#)
            .reply(200, r#"[]"#);
        let api = ApiClient::new(Rc::new(transport.clone()), AppConfig::default());

        let previous = vec![lab("l1", "Apollo Diagnostics", "blr", true)];
        let store = ShopStore::new(ShopState { labs: previous.clone(), ..Default::default() });
        fetch_catalog(&api, &store).await;

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls.len(), 6);
        assert!(urls[0].ends_with("/banners"));
        assert!(urls[5].ends_with("/blogs"));

        assert_eq!(store.banners().with(|b| b.len()), 1);
        assert_eq!(store.categories().with(|c| c[0].name.clone()), "Blood");
        assert_eq!(store.labs().get(), previous);
        assert_eq!(store.packages().with(|p| p[0].id.clone()), "p1");
        assert!(store.catalog_loaded().get());
    }

    #[test]
    fn test_cart_updates_reach_store_and_storage() {
        let storage = MemoryStorage::new();
        let store = ShopStore::new(ShopState::default());
        let item = Item { id: "p1".into(), name: "Thyroid Profile".into(), price: 499.0, is_active: true, ..Default::default() };

        store_add_to_cart(&store, &storage, &item);
        store_add_to_cart(&store, &storage, &item);
        assert_eq!(store.cart().with(|c| c.count()), 2);
        assert_eq!(Cart::load(&storage).count(), 2);

        store_update_cart(&store, &storage, |cart| cart.clear());
        assert!(store.cart().with(|c| c.is_empty()));
        assert!(storage.get(CART_KEY).is_some_and(|saved| !saved.contains("p1")));
    }

    fn lab(id: &str, name: &str, city: &str, active: bool) -> Lab {
        Lab {
            id: id.into(),
            name: name.into(),
            address: format!("{} Main Road", name),
            city: Some(city.into()),
            is_active: active,
            ..Default::default()
        }
    }

    #[test]
    fn test_find_labs_by_city_and_name() {
        let labs = vec![
            lab("l1", "Apollo Diagnostics", "blr", true),
            lab("l2", "Metro Labs", "blr", true),
            lab("l3", "Apollo Clinic", "hyd", true),
            lab("l4", "Apollo Closed", "blr", false),
        ];

        let ids = |found: Vec<&Lab>| found.into_iter().map(|l| l.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(find_labs(&labs, Some("blr"), "")), vec!["l1", "l2"]);
        assert_eq!(ids(find_labs(&labs, None, "apollo")), vec!["l1", "l3"]);
        assert_eq!(ids(find_labs(&labs, Some(""), "metro")), vec!["l2"]);
    }

    #[test]
    fn test_active_packages_sorted_by_price() {
        let items = vec![
            Item { id: "a".into(), price: 900.0, is_active: true, ..Default::default() },
            Item { id: "b".into(), price: 1200.0, discount_price: Some(499.0), is_active: true, ..Default::default() },
            Item { id: "c".into(), price: 100.0, is_active: false, ..Default::default() },
        ];
        let order: Vec<&str> = active_packages(&items, None).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_banners_by_placement() {
        let banners = vec![
            Banner { id: "1".into(), sort_order: 2, is_active: true, ..Default::default() },
            Banner { id: "2".into(), sort_order: 1, is_active: true, placement: Some("home".into()), ..Default::default() },
            Banner { id: "3".into(), is_active: true, placement: Some("offers".into()), ..Default::default() },
            Banner { id: "4".into(), is_active: false, ..Default::default() },
        ];
        let ids: Vec<&str> = active_banners(&banners, "home").iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_find_blog_by_slug_or_id() {
        let blogs = vec![
            Blog { id: "b1".into(), slug: Some("fasting-guide".into()), status: true, ..Default::default() },
            Blog { id: "b2".into(), status: false, ..Default::default() },
        ];
        assert_eq!(find_blog(&blogs, "fasting-guide").unwrap().id, "b1");
        assert_eq!(find_blog(&blogs, "b2").unwrap().id, "b2");
        assert!(find_blog(&blogs, "nope").is_none());
        assert_eq!(published_blogs(&blogs).len(), 1);
    }
}
