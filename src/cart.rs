//! Storefront Cart
//!
//! Packages picked on the storefront plus an optional coupon. Persisted as
//! JSON under one storage key; two open tabs will overwrite each other.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::error::ApiResult;
use crate::models::{Coupon, DiscountType, Item};
use crate::storage::StorageAdapter;

pub const CART_KEY: &str = "cart";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    pub lab_name: Option<String>,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponRejected {
    #[error("This coupon is no longer active")]
    Inactive,
    #[error("This coupon has expired")]
    Expired,
    #[error("Order total is below the coupon minimum")]
    BelowMinimum,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub coupon: Option<Coupon>,
}

impl Cart {
    /// Read the persisted cart. A missing or unreadable entry gives an empty cart.
    pub fn load(storage: &dyn StorageAdapter) -> Self {
        let Some(raw) = storage.get(CART_KEY) else {
            return Self::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Discarding unreadable cart: {}", e);
            Self::default()
        })
    }

    pub fn save(&self, storage: &dyn StorageAdapter) -> ApiResult<()> {
        let raw = serde_json::to_string(self)?;
        storage.set(CART_KEY, &raw)
    }

    /// Add one of `item`, bumping the quantity if it is already in the cart
    pub fn add(&mut self, item: &Item) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item.id) {
            line.quantity += 1;
            return;
        }
        self.lines.push(CartLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            lab_name: item.lab_name.clone(),
            unit_price: item.selling_price(),
            quantity: 1,
        });
    }

    pub fn remove(&mut self, item_id: &str) {
        self.lines.retain(|l| l.item_id != item_id);
        self.revalidate_coupon();
    }

    /// Zero removes the line
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(item_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.quantity = quantity;
        }
        self.revalidate_coupon();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.coupon = None;
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of units, not lines
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn apply_coupon(&mut self, coupon: &Coupon, today: NaiveDate) -> Result<f64, CouponRejected> {
        check_coupon(coupon, self.subtotal(), today)?;
        self.coupon = Some(coupon.clone());
        Ok(self.discount())
    }

    pub fn remove_coupon(&mut self) {
        self.coupon = None;
    }

    // Drop a coupon whose minimum the cart no longer meets
    fn revalidate_coupon(&mut self) {
        let subtotal = self.subtotal();
        if self.coupon.as_ref().is_some_and(|c| subtotal < c.min_order_amount) {
            self.coupon = None;
        }
    }

    pub fn discount(&self) -> f64 {
        let Some(coupon) = &self.coupon else {
            return 0.0;
        };
        let subtotal = self.subtotal();
        let raw = match coupon.discount_type {
            DiscountType::Percentage => subtotal * coupon.discount_value / 100.0,
            DiscountType::Flat => coupon.discount_value,
        };
        let capped = match coupon.max_discount {
            Some(max) if max > 0.0 => raw.min(max),
            _ => raw,
        };
        round_cents(capped.clamp(0.0, subtotal))
    }

    pub fn total(&self) -> f64 {
        round_cents(self.subtotal() - self.discount())
    }
}

fn check_coupon(coupon: &Coupon, subtotal: f64, today: NaiveDate) -> Result<(), CouponRejected> {
    if !coupon.is_active {
        return Err(CouponRejected::Inactive);
    }
    if coupon.expires_on().is_some_and(|last| today > last) {
        return Err(CouponRejected::Expired);
    }
    if subtotal < coupon.min_order_amount {
        return Err(CouponRejected::BelowMinimum);
    }
    Ok(())
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn package(id: &str, price: f64, discount: Option<f64>) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Package {}", id),
            price,
            discount_price: discount,
            is_active: true,
            ..Default::default()
        }
    }

    fn coupon(kind: DiscountType, value: f64, min: f64) -> Coupon {
        Coupon {
            id: "cp".into(),
            code: "HEALTH10".into(),
            discount_type: kind,
            discount_value: value,
            min_order_amount: min,
            expiry_date: Some("2026-06-30".into()),
            is_active: true,
            ..Default::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn test_add_merges_same_package() {
        let mut cart = Cart::default();
        cart.add(&package("p1", 1000.0, Some(799.0)));
        cart.add(&package("p1", 1000.0, Some(799.0)));
        cart.add(&package("p2", 500.0, None));

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.subtotal(), 2098.0);
    }

    #[test]
    fn test_zero_quantity_removes_line() {
        let mut cart = Cart::default();
        cart.add(&package("p1", 300.0, None));
        cart.set_quantity("p1", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_percentage_coupon_with_cap() {
        let mut cart = Cart::default();
        cart.add(&package("p1", 2000.0, None));
        let mut cp = coupon(DiscountType::Percentage, 10.0, 500.0);
        cp.max_discount = Some(150.0);

        assert_eq!(cart.apply_coupon(&cp, today()), Ok(150.0));
        assert_eq!(cart.total(), 1850.0);
    }

    #[test]
    fn test_flat_coupon_never_exceeds_subtotal() {
        let mut cart = Cart::default();
        cart.add(&package("p1", 80.0, None));
        cart.apply_coupon(&coupon(DiscountType::Flat, 100.0, 0.0), today()).unwrap();
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_rejected_coupons() {
        let mut cart = Cart::default();
        cart.add(&package("p1", 400.0, None));

        let mut inactive = coupon(DiscountType::Flat, 50.0, 0.0);
        inactive.is_active = false;
        assert_eq!(cart.apply_coupon(&inactive, today()), Err(CouponRejected::Inactive));

        let expired = coupon(DiscountType::Flat, 50.0, 0.0);
        let later = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        assert_eq!(cart.apply_coupon(&expired, later), Err(CouponRejected::Expired));

        let minimum = coupon(DiscountType::Flat, 50.0, 500.0);
        assert_eq!(cart.apply_coupon(&minimum, today()), Err(CouponRejected::BelowMinimum));
        assert!(cart.coupon.is_none());
    }

    #[test]
    fn test_coupon_dropped_when_below_minimum() {
        let mut cart = Cart::default();
        cart.add(&package("p1", 300.0, None));
        cart.add(&package("p2", 300.0, None));
        cart.apply_coupon(&coupon(DiscountType::Flat, 50.0, 500.0), today()).unwrap();

        cart.remove("p2");
        assert!(cart.coupon.is_none());
        assert_eq!(cart.total(), 300.0);
    }

    #[test]
    fn test_persists_through_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(Cart::load(&storage), Cart::default());

        let mut cart = Cart::default();
        cart.add(&package("p1", 650.0, None));
        cart.save(&storage).unwrap();

        assert_eq!(Cart::load(&storage), cart);
    }

    #[test]
    fn test_corrupt_entry_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set(CART_KEY, "{not json").unwrap();
        assert!(Cart::load(&storage).is_empty());
    }
}
