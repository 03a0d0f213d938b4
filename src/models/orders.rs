//! Customer orders

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::form::{FieldKind, FieldSpec};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderLine {
    pub item_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub lines: Vec<OrderLine>,
    pub total_amount: f64,
    pub payment_status: String,
    pub collection_date: Option<String>,
    pub notes: Option<String>,
    pub sample_collected: bool,
    pub created_at: Option<String>,
}

impl Resource for Order {
    type Id = String;
    const ENDPOINT: &'static str = "orders";
    const LABEL: &'static str = "Order";
    const STATUS_FIELD: &'static str = "sampleCollected";
    const SERVER_SEARCH: bool = true;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Order", "orderNumber"),
        ("Customer", "customerName"),
        ("Items", "lines"),
        ("Total", "totalAmount"),
        ("Payment", "paymentStatus"),
        ("Collected", "sampleCollected"),
    ];

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_text(&self) -> &str {
        &self.customer_name
    }

    fn is_active(&self) -> bool {
        self.sample_collected
    }

    fn set_active(&mut self, active: bool) {
        self.sample_collected = active;
    }

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("customerName", "Customer").required(),
            FieldSpec::text("customerPhone", "Phone"),
            FieldSpec::new(
                "paymentStatus",
                "Payment",
                FieldKind::Select(&[("pending", "Pending"), ("paid", "Paid"), ("refunded", "Refunded")]),
            )
            .required(),
            FieldSpec::new("collectionDate", "Collection date", FieldKind::Date),
            FieldSpec::new("notes", "Notes", FieldKind::TextArea),
            FieldSpec::checkbox("sampleCollected", "Sample collected"),
        ];
        FIELDS
    }
}
