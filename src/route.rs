//! Views
//!
//! The app switches views through a signal holding a `Route`, no router.

/// One management screen per backend resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminSection {
    Categories,
    Departments,
    ItemTypes,
    Items,
    Diseases,
    Labs,
    Certificates,
    Coupons,
    Blogs,
    Tags,
    Banners,
    Orders,
    Countries,
    States,
    Cities,
    Areas,
}

impl AdminSection {
    /// Sidebar order, grouped by (group, sections)
    pub const GROUPS: &'static [(&'static str, &'static [AdminSection])] = &[
        (
            "Catalog",
            &[
                AdminSection::Categories,
                AdminSection::Departments,
                AdminSection::ItemTypes,
                AdminSection::Items,
                AdminSection::Diseases,
            ],
        ),
        ("Labs", &[AdminSection::Labs, AdminSection::Certificates]),
        (
            "Marketing",
            &[AdminSection::Coupons, AdminSection::Blogs, AdminSection::Tags, AdminSection::Banners],
        ),
        ("Sales", &[AdminSection::Orders]),
        (
            "Locations",
            &[AdminSection::Countries, AdminSection::States, AdminSection::Cities, AdminSection::Areas],
        ),
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AdminSection::Categories => "Categories",
            AdminSection::Departments => "Departments",
            AdminSection::ItemTypes => "Item Types",
            AdminSection::Items => "Tests & Packages",
            AdminSection::Diseases => "Diseases",
            AdminSection::Labs => "Labs",
            AdminSection::Certificates => "Certificates",
            AdminSection::Coupons => "Coupons",
            AdminSection::Blogs => "Blog",
            AdminSection::Tags => "Tags",
            AdminSection::Banners => "Banners",
            AdminSection::Orders => "Orders",
            AdminSection::Countries => "Countries",
            AdminSection::States => "States",
            AdminSection::Cities => "Cities",
            AdminSection::Areas => "Areas",
        }
    }

    pub fn all() -> impl Iterator<Item = AdminSection> {
        Self::GROUPS.iter().flat_map(|(_, sections)| sections.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    LabFinder,
    Packages,
    Cart,
    Blog,
    BlogPost(String),
    Login,
    Admin(AdminSection),
}

impl Route {
    pub fn is_admin(&self) -> bool {
        matches!(self, Route::Admin(_))
    }

    /// Storefront navigation entries
    pub const SHOP_NAV: &'static [(&'static str, Route)] = &[
        ("Home", Route::Home),
        ("Find a Lab", Route::LabFinder),
        ("Packages", Route::Packages),
        ("Blog", Route::Blog),
    ];
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_section_listed_once() {
        let sections: Vec<AdminSection> = AdminSection::all().collect();
        let unique: HashSet<AdminSection> = sections.iter().copied().collect();
        assert_eq!(sections.len(), 16);
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_admin_routes() {
        assert!(Route::Admin(AdminSection::Orders).is_admin());
        assert!(!Route::BlogPost("x".into()).is_admin());
    }
}
