//! Admin Shell
//!
//! Sidebar of sections on the left, the selected resource page on the right.

use leptos::prelude::*;

use crate::components::{resource_page, TitleBar};
use crate::context::use_app_context;
use crate::models::{
    Area, Banner, Blog, Category, Certificate, City, Country, Coupon, Department, Disease, Item, ItemType, Lab,
    Order, State, Tag,
};
use crate::route::{AdminSection, Route};

fn section_view(section: AdminSection) -> AnyView {
    let title = section.title();
    match section {
        AdminSection::Categories => resource_page::<Category>(title).into_any(),
        AdminSection::Departments => resource_page::<Department>(title).into_any(),
        AdminSection::ItemTypes => resource_page::<ItemType>(title).into_any(),
        AdminSection::Items => resource_page::<Item>(title).into_any(),
        AdminSection::Diseases => resource_page::<Disease>(title).into_any(),
        AdminSection::Labs => resource_page::<Lab>(title).into_any(),
        AdminSection::Certificates => resource_page::<Certificate>(title).into_any(),
        AdminSection::Coupons => resource_page::<Coupon>(title).into_any(),
        AdminSection::Blogs => resource_page::<Blog>(title).into_any(),
        AdminSection::Tags => resource_page::<Tag>(title).into_any(),
        AdminSection::Banners => resource_page::<Banner>(title).into_any(),
        AdminSection::Orders => resource_page::<Order>(title).into_any(),
        AdminSection::Countries => resource_page::<Country>(title).into_any(),
        AdminSection::States => resource_page::<State>(title).into_any(),
        AdminSection::Cities => resource_page::<City>(title).into_any(),
        AdminSection::Areas => resource_page::<Area>(title).into_any(),
    }
}

#[component]
fn Sidebar(current: Memo<AdminSection>) -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <nav class="admin-sidebar">
            {AdminSection::GROUPS
                .iter()
                .map(|(group, sections)| {
                    view! {
                        <div class="sidebar-group">
                            <div class="sidebar-group-title">{*group}</div>
                            {sections
                                .iter()
                                .map(|section| {
                                    let section = *section;
                                    let class = move || {
                                        if current.get() == section { "sidebar-link active" } else { "sidebar-link" }
                                    };
                                    view! {
                                        <button class=class on:click=move |_| ctx.navigate(Route::Admin(section))>
                                            {section.title()}
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                })
                .collect_view()}
        </nav>
    }
}

#[component]
pub fn AdminShell() -> impl IntoView {
    let ctx = use_app_context();
    // Arriving from the login screen lands on the first section
    let current = Memo::new(move |_| match ctx.route.get() {
        Route::Admin(section) => section,
        _ => AdminSection::Categories,
    });

    view! {
        <div class="admin-layout">
            <TitleBar />
            <div class="admin-body">
                <Sidebar current />
                <main class="admin-content">
                    // Keyed on the section so each page gets a fresh owner and lifetime
                    {move || section_view(current.get())}
                </main>
            </div>
        </div>
    }
}
