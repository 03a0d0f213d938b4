//! UI Components
//!
//! Reusable Leptos components.

mod form_modal;
mod log_panel;
mod login_form;
mod notice_list;
mod resource_page;
mod title_bar;

pub use login_form::LoginForm;
pub use resource_page::resource_page;
pub use title_bar::TitleBar;
