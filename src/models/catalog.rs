//! Catalog records: categories, departments, item types, items, diseases

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::form::{FieldKind, FieldSpec, SORT_ORDER};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl Resource for Category {
    type Id = String;
    const ENDPOINT: &'static str = "categories";
    const LABEL: &'static str = "Category";
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("Name", "name"), ("Sort", "sortOrder"), ("Active", "isActive")];

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_text(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("name", "Name").required(),
            FieldSpec::new("description", "Description", FieldKind::TextArea),
            FieldSpec::image("image", "Image"),
            SORT_ORDER,
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Department {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl Resource for Department {
    type Id = String;
    const ENDPOINT: &'static str = "departments";
    const LABEL: &'static str = "Department";
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("Name", "name"), ("Description", "description"), ("Sort", "sortOrder")];

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_text(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("name", "Name").required(),
            FieldSpec::new("description", "Description", FieldKind::TextArea),
            FieldSpec::text("icon", "Icon URL"),
            SORT_ORDER,
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

/// Kind of orderable item, e.g. test, package, scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemType {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub code: String,
    pub sort_order: i32,
    pub is_active: bool,
}

impl Resource for ItemType {
    type Id = String;
    const ENDPOINT: &'static str = "item-types";
    const LABEL: &'static str = "Item type";
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("Name", "name"), ("Code", "code"), ("Sort", "sortOrder"), ("Active", "isActive")];

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_text(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("name", "Name").required(),
            FieldSpec::text("code", "Code").required(),
            SORT_ORDER,
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

/// A test or package a customer can book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub item_type: Option<String>,
    pub category: Option<String>,
    pub lab: Option<String>,
    pub lab_name: Option<String>,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub tests_included: Option<u32>,
    pub sample_type: Option<String>,
    pub report_time: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl Item {
    /// Price the customer pays
    pub fn selling_price(&self) -> f64 {
        match self.discount_price {
            Some(p) if p > 0.0 && p < self.price => p,
            _ => self.price,
        }
    }
}

impl Resource for Item {
    type Id = String;
    const ENDPOINT: &'static str = "items";
    const LABEL: &'static str = "Item";
    const SERVER_SEARCH: bool = true;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Name", "name"),
        ("Lab", "labName"),
        ("Price", "price"),
        ("Offer", "discountPrice"),
        ("Active", "isActive"),
    ];

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_text(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("name", "Name").required(),
            FieldSpec::new("itemType", "Type", FieldKind::Reference("item-types")).required(),
            FieldSpec::new("category", "Category", FieldKind::Reference("categories")),
            FieldSpec::new("lab", "Lab", FieldKind::Reference("labs")).required(),
            FieldSpec::number("price", "Price", Some(0.0), None).required(),
            FieldSpec::number("discountPrice", "Offer price", Some(0.0), None),
            FieldSpec::number("testsIncluded", "Tests included", Some(1.0), Some(500.0)),
            FieldSpec::new(
                "sampleType",
                "Sample",
                FieldKind::Select(&[("blood", "Blood"), ("urine", "Urine"), ("stool", "Stool"), ("none", "None")]),
            ),
            FieldSpec::text("reportTime", "Report time"),
            FieldSpec::new("description", "Description", FieldKind::TextArea),
            FieldSpec::image("image", "Image"),
            SORT_ORDER,
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Disease {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub status: bool,
}

impl Resource for Disease {
    type Id = String;
    const ENDPOINT: &'static str = "diseases";
    const LABEL: &'static str = "Disease";
    const STATUS_FIELD: &'static str = "status";
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("Name", "name"), ("Sort", "sortOrder"), ("Status", "status")];

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_text(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.status
    }

    fn set_active(&mut self, active: bool) {
        self.status = active;
    }

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("name", "Name").required(),
            FieldSpec::new("description", "Description", FieldKind::TextArea),
            FieldSpec::image("icon", "Icon"),
            SORT_ORDER,
            FieldSpec::checkbox("status", "Active"),
        ];
        FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selling_price_prefers_valid_offer() {
        let mut item = Item { price: 1000.0, discount_price: Some(799.0), ..Default::default() };
        assert_eq!(item.selling_price(), 799.0);

        item.discount_price = Some(1200.0);
        assert_eq!(item.selling_price(), 1000.0);

        item.discount_price = Some(0.0);
        assert_eq!(item.selling_price(), 1000.0);
    }

    #[test]
    fn test_disease_status_flag() {
        let mut disease: Disease = serde_json::from_str(r#"{"_id":"d1","name":"Diabetes","status":true}"#).unwrap();
        assert!(disease.is_active());
        disease.set_active(false);
        assert_eq!(serde_json::to_value(&disease).unwrap()["status"], false);
    }
}
