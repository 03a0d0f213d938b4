//! Resource Collections
//!
//! The list/detail/mutate contract shared by every management screen.

mod cell;
mod controller;
mod state;

pub use controller::Collection;
pub use state::CollectionState;
