//! State Cells
//!
//! Where a controller keeps its state. In the app this is a Leptos signal so
//! views re-render; tests use a plain `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

pub trait StateCell<S>: Clone + 'static {
    /// Read without subscribing
    fn inspect<U>(&self, f: impl FnOnce(&S) -> U) -> U;

    /// Mutate and notify
    fn modify(&self, f: impl FnOnce(&mut S));
}

impl<S: Send + Sync + 'static> StateCell<S> for RwSignal<S> {
    fn inspect<U>(&self, f: impl FnOnce(&S) -> U) -> U {
        self.with_untracked(f)
    }

    fn modify(&self, f: impl FnOnce(&mut S)) {
        self.update(f);
    }
}

impl<S: 'static> StateCell<S> for Rc<RefCell<S>> {
    fn inspect<U>(&self, f: impl FnOnce(&S) -> U) -> U {
        f(&self.borrow())
    }

    fn modify(&self, f: impl FnOnce(&mut S)) {
        f(&mut self.borrow_mut());
    }
}
