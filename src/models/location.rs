//! Location hierarchy: country > state > city > area

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::form::{FieldKind, FieldSpec};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Country {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    pub is_active: bool,
}

impl Resource for Country {
    type Id = String;
    const ENDPOINT: &'static str = "countries";
    const LABEL: &'static str = "Country";
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("Name", "name"), ("Code", "code"), ("Active", "isActive")];

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
            FieldSpec::text("code", "ISO code"),
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct State {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub is_active: bool,
}

impl Resource for State {
    type Id = String;
    const ENDPOINT: &'static str = "states";
    const LABEL: &'static str = "State";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[("Name", "name"), ("Active", "isActive")];

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
            FieldSpec::new("country", "Country", FieldKind::Reference("countries")).required(),
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct City {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub state: Option<String>,
    pub is_active: bool,
}

impl Resource for City {
    type Id = String;
    const ENDPOINT: &'static str = "cities";
    const LABEL: &'static str = "City";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[("Name", "name"), ("Active", "isActive")];

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
            FieldSpec::new("state", "State", FieldKind::Reference("states")).required(),
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Area {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub is_active: bool,
}

impl Resource for Area {
    type Id = String;
    const ENDPOINT: &'static str = "areas";
    const LABEL: &'static str = "Area";
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("Name", "name"), ("Pincode", "pincode"), ("Active", "isActive")];

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
            FieldSpec::new("city", "City", FieldKind::Reference("cities")).required(),
            FieldSpec::text("pincode", "Pincode"),
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}
