//! Frontend Models
//!
//! Records owned by the backend, mirrored as-is. The `Resource` trait is the
//! contract a record type needs for the generic collection screens.

mod catalog;
mod labs;
mod location;
mod marketing;
mod orders;
mod user;

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::form::{FieldSpec, FormValues};

pub use catalog::{Category, Department, Disease, Item, ItemType};
pub use labs::{Certificate, Lab};
pub use location::{Area, City, Country, State};
pub use marketing::{Banner, Blog, Coupon, DiscountType, Tag};
pub use orders::Order;
pub use user::User;

/// A backend record type managed through one REST endpoint
pub trait Resource:
    Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Id: Debug + Clone + Eq + Ord + Hash + Display + Send + Sync + 'static;

    /// Path under the API base
    const ENDPOINT: &'static str;
    /// Singular display name
    const LABEL: &'static str;
    /// Wire name of the flag flipped by toggle-status
    const STATUS_FIELD: &'static str = "isActive";
    /// Whether list requests forward the search term to the server
    const SERVER_SEARCH: bool = false;
    /// Create endpoint when it differs from `ENDPOINT`
    const CREATE_PATH: Option<&'static str> = None;
    /// Multipart writes use the long upload timeout
    const SLOW_UPLOAD: bool = false;
    /// Table columns: (header, wire field)
    const COLUMNS: &'static [(&'static str, &'static str)];

    fn id(&self) -> Self::Id;

    /// Text matched by the client-side search box
    fn display_text(&self) -> &str;

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn schema() -> &'static [FieldSpec];

    /// Form prefilled for editing this record
    fn to_form(&self) -> FormValues {
        FormValues::from_record(self, Self::schema())
    }

    /// Cell text for each of `COLUMNS`
    fn cells(&self) -> Vec<String> {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        Self::COLUMNS
            .iter()
            .map(|(_, field)| cell_text(value.get(*field)))
            .collect()
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(Value::Array(items)) => format!("{} item(s)", items.len()),
        Some(other) => other.to_string(),
    }
}
