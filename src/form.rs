//! Form Schemas
//!
//! Each resource describes its modal form as a static list of fields. The
//! same schema drives rendering, client-side validation and the request body
//! (JSON, or multipart as soon as a file is attached).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::api::{FileUpload, FormPart, RequestBody};
use crate::error::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Date,
    Number { min: Option<f64>, max: Option<f64> },
    Checkbox,
    /// Fixed choices: (value, label)
    Select(&'static [(&'static str, &'static str)]),
    /// Id of a record from another endpoint, picked by name
    Reference(&'static str),
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: false }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn number(name: &'static str, label: &'static str, min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(name, label, FieldKind::Number { min, max })
    }

    pub const fn checkbox(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub const fn image(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Image)
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }
}

/// Common trailing fields shared by most catalog records
pub const SORT_ORDER: FieldSpec = FieldSpec::number("sortOrder", "Sort order", Some(0.0), None);

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    File(FileUpload),
}

/// Current values of a modal form, keyed by wire field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    values: BTreeMap<String, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a create form
    pub fn defaults(schema: &[FieldSpec]) -> Self {
        let mut form = Self::new();
        for field in schema {
            match field.kind {
                FieldKind::Checkbox => form.set_flag(field.name, true),
                FieldKind::Select(options) => {
                    if let Some((value, _)) = options.first() {
                        form.set_text(field.name, *value);
                    }
                }
                _ => {}
            }
        }
        form
    }

    /// Prefill from a record's wire representation
    pub fn from_record<T: Serialize>(record: &T, schema: &[FieldSpec]) -> Self {
        let mut form = Self::new();
        let Ok(Value::Object(map)) = serde_json::to_value(record) else {
            return form;
        };
        for field in schema {
            match (field.kind, map.get(field.name)) {
                (_, None) | (_, Some(Value::Null)) => {}
                (FieldKind::Checkbox, Some(Value::Bool(b))) => form.set_flag(field.name, *b),
                (FieldKind::Date, Some(Value::String(s))) => {
                    // Keep the yyyy-mm-dd part for <input type="date">
                    form.set_text(field.name, s.get(..10).unwrap_or(s));
                }
                (_, Some(Value::String(s))) => form.set_text(field.name, s.clone()),
                (_, Some(other)) => form.set_text(field.name, other.to_string()),
            }
        }
        form
    }

    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_text(name, value);
        self
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), FieldValue::Text(value.into()));
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_string(), FieldValue::Flag(value));
    }

    pub fn set_file(&mut self, name: &str, file: FileUpload) {
        self.values.insert(name.to_string(), FieldValue::File(file));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> String {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => s.clone(),
            Some(FieldValue::File(f)) => f.file_name.clone(),
            Some(FieldValue::Flag(b)) => b.to_string(),
            None => String::new(),
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FieldValue::Flag(true)))
    }

    pub fn has_file(&self) -> bool {
        self.values.values().any(|v| matches!(v, FieldValue::File(_)))
    }
}

fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !text.contains(char::is_whitespace)
}

fn fmt_bound(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Client-side checks run before any request is issued
pub fn validate(schema: &[FieldSpec], values: &FormValues) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for field in schema {
        let present = match values.get(field.name) {
            Some(FieldValue::Text(s)) => !s.trim().is_empty(),
            Some(FieldValue::File(_)) => true,
            Some(FieldValue::Flag(_)) => true,
            None => false,
        };

        if !present {
            if field.required && field.kind != FieldKind::Checkbox {
                errors.insert(field.name.to_string(), format!("{} is required", field.label));
            }
            continue;
        }

        let text = values.text(field.name);
        let text = text.trim();
        match field.kind {
            FieldKind::Number { min, max } => match text.parse::<f64>() {
                Ok(n) if !n.is_finite() => {
                    errors.insert(field.name.to_string(), format!("{} must be a number", field.label));
                }
                Ok(n) => {
                    if let Some(min) = min.filter(|m| n < *m) {
                        errors.insert(field.name.to_string(), format!("{} must be at least {}", field.label, fmt_bound(min)));
                    } else if let Some(max) = max.filter(|m| n > *m) {
                        errors.insert(field.name.to_string(), format!("{} must be at most {}", field.label, fmt_bound(max)));
                    }
                }
                Err(_) => {
                    errors.insert(field.name.to_string(), format!("{} must be a number", field.label));
                }
            },
            FieldKind::Email if !is_email(text) => {
                errors.insert(field.name.to_string(), format!("{} must be a valid e-mail address", field.label));
            }
            FieldKind::Select(options) if !options.iter().any(|(v, _)| *v == text) => {
                errors.insert(field.name.to_string(), format!("{} has an unknown value", field.label));
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn json_number(text: &str) -> Value {
    let Ok(n) = text.trim().parse::<f64>() else {
        return Value::String(text.to_string());
    };
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Wire value for a field the user emptied: null for typed fields, "" for text
fn cleared(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Number { .. } | FieldKind::Date | FieldKind::Reference(_) => Value::Null,
        _ => Value::String(String::new()),
    }
}

/// Serialize validated values: multipart when a file is attached, JSON otherwise.
///
/// With `send_cleared` (updates), emptied fields are sent so the server drops
/// the old value; creates leave them out. Image fields are never cleared this way.
pub fn to_body(schema: &[FieldSpec], values: &FormValues, send_cleared: bool) -> RequestBody {
    if values.has_file() {
        let mut parts = Vec::new();
        for field in schema {
            match values.get(field.name) {
                Some(FieldValue::File(file)) => parts.push(FormPart::File {
                    name: field.name.to_string(),
                    file: file.clone(),
                }),
                Some(FieldValue::Flag(b)) => parts.push(FormPart::Text {
                    name: field.name.to_string(),
                    value: b.to_string(),
                }),
                Some(FieldValue::Text(s)) if !s.trim().is_empty() => parts.push(FormPart::Text {
                    name: field.name.to_string(),
                    value: s.trim().to_string(),
                }),
                Some(FieldValue::Text(_)) if send_cleared && field.kind != FieldKind::Image => {
                    parts.push(FormPart::Text {
                        name: field.name.to_string(),
                        value: String::new(),
                    })
                }
                _ => {}
            }
        }
        return RequestBody::Multipart(parts);
    }

    let mut map = Map::new();
    for field in schema {
        let value = match (field.kind, values.get(field.name)) {
            (FieldKind::Checkbox, value) => Value::Bool(matches!(value, Some(FieldValue::Flag(true)))),
            (FieldKind::Image, Some(FieldValue::Text(s))) if s.trim().is_empty() => continue,
            (kind, Some(FieldValue::Text(s))) if s.trim().is_empty() => {
                if !send_cleared {
                    continue;
                }
                cleared(kind)
            }
            (FieldKind::Number { .. }, Some(FieldValue::Text(s))) => json_number(s),
            (_, Some(FieldValue::Text(s))) => Value::String(s.trim().to_string()),
            (_, Some(FieldValue::Flag(b))) => Value::Bool(*b),
            _ => continue,
        };
        map.insert(field.name.to_string(), value);
    }
    RequestBody::Json(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: &[FieldSpec] = &[
        FieldSpec::text("name", "Name").required(),
        FieldSpec::number("price", "Price", Some(0.0), Some(100000.0)).required(),
        FieldSpec::new("email", "E-mail", FieldKind::Email),
        FieldSpec::checkbox("isActive", "Active"),
        FieldSpec::image("image", "Image"),
    ];

    #[test]
    fn test_required_fields_reported() {
        let errors = validate(SCHEMA, &FormValues::new()).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), "Name is required");
        assert_eq!(errors.get("price").unwrap(), "Price is required");
        assert!(!errors.contains_key("isActive"));
        assert!(!errors.contains_key("image"));
    }

    #[test]
    fn test_numeric_range_and_email() {
        let values = FormValues::new()
            .with_text("name", "CBC")
            .with_text("price", "-5")
            .with_text("email", "lab@");
        let errors = validate(SCHEMA, &values).unwrap_err();
        assert_eq!(errors.get("price").unwrap(), "Price must be at least 0");
        assert_eq!(errors.get("email").unwrap(), "E-mail must be a valid e-mail address");

        let values = values.with_text("price", "abc").with_text("email", "lab@example.com");
        let errors = validate(SCHEMA, &values).unwrap_err();
        assert_eq!(errors.get("price").unwrap(), "Price must be a number");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_json_body_types() {
        let mut values = FormValues::new().with_text("name", " CBC ").with_text("price", "450");
        values.set_flag("isActive", false);
        assert_eq!(
            to_body(SCHEMA, &values, false),
            RequestBody::Json(json!({ "name": "CBC", "price": 450, "isActive": false }))
        );
    }

    #[test]
    fn test_emptied_fields_sent_only_on_update() {
        let schema = [
            FieldSpec::text("name", "Name").required(),
            FieldSpec::new("description", "Description", FieldKind::TextArea),
            FieldSpec::number("maxDiscount", "Max discount", Some(0.0), None),
            FieldSpec::image("image", "Image"),
        ];
        let values = FormValues::new()
            .with_text("name", "Blood")
            .with_text("description", "  ")
            .with_text("maxDiscount", "")
            .with_text("image", "");

        assert_eq!(to_body(&schema, &values, false), RequestBody::Json(json!({ "name": "Blood" })));
        assert_eq!(
            to_body(&schema, &values, true),
            RequestBody::Json(json!({ "name": "Blood", "description": "", "maxDiscount": null }))
        );
    }

    #[test]
    fn test_file_switches_to_multipart() {
        let mut values = FormValues::defaults(SCHEMA).with_text("name", "CBC").with_text("price", "1.5");
        values.set_file("image", FileUpload { file_name: "a.png".into(), mime: "image/png".into(), bytes: vec![1, 2] });

        let RequestBody::Multipart(parts) = to_body(SCHEMA, &values, false) else {
            panic!("expected multipart body");
        };
        let names: Vec<&str> = parts
            .iter()
            .map(|p| match p {
                FormPart::Text { name, .. } | FormPart::File { name, .. } => name.as_str(),
            })
            .collect();
        assert_eq!(names, vec!["name", "price", "isActive", "image"]);
    }

    #[test]
    fn test_from_record_prefills() {
        let record = json!({ "name": "Apollo", "price": 300, "isActive": true, "expiryDate": "2026-12-31T00:00:00Z" });
        let schema = [
            FieldSpec::text("name", "Name"),
            FieldSpec::number("price", "Price", None, None),
            FieldSpec::checkbox("isActive", "Active"),
            FieldSpec::new("expiryDate", "Expiry", FieldKind::Date),
        ];
        let form = FormValues::from_record(&record, &schema);
        assert_eq!(form.text("name"), "Apollo");
        assert_eq!(form.text("price"), "300");
        assert!(form.flag("isActive"));
        assert_eq!(form.text("expiryDate"), "2026-12-31");
    }
}
