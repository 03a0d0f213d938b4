//! Storefront content: coupons, blog posts, tags, banners

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::form::{FieldKind, FieldSpec, SORT_ORDER};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Percentage,
    Flat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Coupon {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub min_order_amount: f64,
    pub max_discount: Option<f64>,
    pub expiry_date: Option<String>,
    pub is_active: bool,
}

impl Coupon {
    /// Last valid day, from either a date or a full timestamp
    pub fn expires_on(&self) -> Option<NaiveDate> {
        let raw = self.expiry_date.as_deref()?;
        NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
    }
}

impl Resource for Coupon {
    type Id = String;
    const ENDPOINT: &'static str = "coupons";
    const LABEL: &'static str = "Coupon";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Code", "code"),
        ("Type", "discountType"),
        ("Value", "discountValue"),
        ("Min order", "minOrderAmount"),
        ("Expires", "expiryDate"),
        ("Active", "isActive"),
    ];

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_text(&self) -> &str {
        &self.code
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("code", "Code").required(),
            FieldSpec::new("description", "Description", FieldKind::TextArea),
            FieldSpec::new(
                "discountType",
                "Discount type",
                FieldKind::Select(&[("percentage", "Percentage"), ("flat", "Flat amount")]),
            )
            .required(),
            FieldSpec::number("discountValue", "Discount", Some(0.0), None).required(),
            FieldSpec::number("minOrderAmount", "Minimum order", Some(0.0), None),
            FieldSpec::number("maxDiscount", "Maximum discount", Some(0.0), None),
            FieldSpec::new("expiryDate", "Expires on", FieldKind::Date),
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Blog {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub author: Option<String>,
    /// Markdown
    pub content: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub published_at: Option<String>,
    pub status: bool,
}

impl Resource for Blog {
    type Id = String;
    const ENDPOINT: &'static str = "blogs";
    const LABEL: &'static str = "Blog post";
    const STATUS_FIELD: &'static str = "status";
    const SERVER_SEARCH: bool = true;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Title", "title"),
        ("Author", "author"),
        ("Tags", "tags"),
        ("Published", "publishedAt"),
        ("Live", "status"),
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
            FieldSpec::text("slug", "Slug"),
            FieldSpec::text("author", "Author"),
            FieldSpec::new("content", "Content (markdown)", FieldKind::TextArea).required(),
            FieldSpec::image("image", "Cover image"),
            FieldSpec::new("publishedAt", "Publish date", FieldKind::Date),
            FieldSpec::checkbox("status", "Published"),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tag {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub status: bool,
}

impl Resource for Tag {
    type Id = String;
    const ENDPOINT: &'static str = "tags";
    const LABEL: &'static str = "Tag";
    const STATUS_FIELD: &'static str = "status";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[("Name", "name"), ("Slug", "slug"), ("Active", "status")];

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
            FieldSpec::text("slug", "Slug"),
            FieldSpec::checkbox("status", "Active"),
        ];
        FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Banner {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub placement: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl Resource for Banner {
    type Id = String;
    const ENDPOINT: &'static str = "banners";
    const LABEL: &'static str = "Banner";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Title", "title"),
        ("Placement", "placement"),
        ("Sort", "sortOrder"),
        ("Active", "isActive"),
    ];

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_text(&self) -> &str {
        &self.title
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("title", "Title").required(),
            FieldSpec::text("subtitle", "Subtitle"),
            FieldSpec::image("image", "Image").required(),
            FieldSpec::text("link", "Link"),
            FieldSpec::new(
                "placement",
                "Placement",
                FieldKind::Select(&[("home", "Home hero"), ("offers", "Offers strip"), ("labs", "Lab finder")]),
            ),
            SORT_ORDER,
            FieldSpec::checkbox("isActive", "Active"),
        ];
        FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_expiry_accepts_timestamp() {
        let coupon: Coupon = serde_json::from_str(
            r#"{"_id":"k1","code":"HEALTH10","discountType":"flat","discountValue":100,"expiryDate":"2026-11-30T18:30:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(coupon.discount_type, DiscountType::Flat);
        assert_eq!(coupon.expires_on(), NaiveDate::from_ymd_opt(2026, 11, 30));
    }

    #[test]
    fn test_blog_tags_cell_counts_items() {
        let blog = Blog { title: "Fasting before tests".into(), tags: vec!["tips".into(), "blood".into()], ..Default::default() };
        assert_eq!(blog.cells()[2], "2 item(s)");
    }
}
