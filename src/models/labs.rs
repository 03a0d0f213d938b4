//! Labs and their accreditation certificates

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::form::{FieldKind, FieldSpec, SORT_ORDER};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lab {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub city_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub accreditation: Option<String>,
    pub rating: Option<f64>,
    pub home_collection: bool,
    pub image: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl Resource for Lab {
    type Id = String;
    const ENDPOINT: &'static str = "labs";
    const LABEL: &'static str = "Lab";
    const SERVER_SEARCH: bool = true;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Name", "name"),
        ("City", "cityName"),
        ("Phone", "phone"),
        ("Home collection", "homeCollection"),
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
            FieldSpec::new("address", "Address", FieldKind::TextArea).required(),
            FieldSpec::new("city", "City", FieldKind::Reference("cities")).required(),
            FieldSpec::text("phone", "Phone"),
            FieldSpec::new("email", "E-mail", FieldKind::Email),
            FieldSpec::text("accreditation", "Accreditation"),
            FieldSpec::number("rating", "Rating", Some(0.0), Some(5.0)),
            FieldSpec::checkbox("homeCollection", "Home collection"),
            FieldSpec::image("image", "Photo"),
            SORT_ORDER,
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certificate {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub issued_by: Option<String>,
    pub lab: Option<String>,
    pub file: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub status: bool,
}

impl Resource for Certificate {
    type Id = String;
    const ENDPOINT: &'static str = "certificates";
    const LABEL: &'static str = "Certificate";
    const STATUS_FIELD: &'static str = "status";
    const CREATE_PATH: Option<&'static str> = Some("certificates/upload");
    const SLOW_UPLOAD: bool = true;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Title", "title"),
        ("Issued by", "issuedBy"),
        ("Expires", "expiryDate"),
        ("Status", "status"),
    ];

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_text(&self) -> &str {
        &self.title
    }

    fn is_active(&self) -> bool {
        self.status
    }

    fn set_active(&mut self, active: bool) {
        self.status = active;
    }

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("title", "Title").required(),
            FieldSpec::text("issuedBy", "Issued by"),
            FieldSpec::new("lab", "Lab", FieldKind::Reference("labs")),
            FieldSpec::new("issueDate", "Issued on", FieldKind::Date),
            FieldSpec::new("expiryDate", "Expires on", FieldKind::Date),
            FieldSpec::image("file", "Certificate file").required(),
            FieldSpec::checkbox("status", "Active"),
        ];
        FIELDS
    }
}
