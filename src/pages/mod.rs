//! Top-level views, one per `Route`

mod admin;
mod blog;
mod cart;
mod home;
mod lab_finder;
mod packages;
mod shop;

pub use admin::AdminShell;
pub use blog::{BlogListPage, BlogPostPage};
pub use cart::CartPage;
pub use home::HomePage;
pub use lab_finder::LabFinderPage;
pub use packages::PackagesPage;
pub use shop::{load_catalog, ShopHeader};
