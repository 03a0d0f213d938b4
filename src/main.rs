//! DiagLab frontend entry point

mod api;
mod app;
mod cart;
mod collection;
mod components;
mod config;
mod confirm;
mod context;
mod error;
mod form;
mod lifetime;
mod markdown;
mod models;
mod notice;
mod pages;
mod route;
mod session;
mod storage;
mod store;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load();
    console_logger::init(&config.log_level);
    tracing::info!("DiagLab starting against {}", config.api_base);

    mount_to_body(move || view! { <App config /> });
}
