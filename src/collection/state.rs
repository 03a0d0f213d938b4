//! Collection State
//!
//! Everything a management screen shows for one resource, and the pure
//! transitions applied to it. No I/O happens here.

use std::collections::BTreeSet;

use crate::api::ListQuery;
use crate::error::FieldErrors;
use crate::form::FormValues;
use crate::models::Resource;
use crate::notice::Notices;

#[derive(Debug, Clone)]
pub struct CollectionState<R: Resource> {
    pub items: Vec<R>,
    pub loading: bool,
    pub search: String,
    pub page: usize,
    pub page_size: usize,
    pub selected: BTreeSet<R::Id>,
    pub dialog_open: bool,
    pub editing: Option<R>,
    pub form: FormValues,
    pub form_errors: FieldErrors,
    pub submit_error: Option<String>,
    pub submitting: bool,
    pub notices: Notices,
}

/// One rendered page of the filtered list
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<R> {
    pub rows: Vec<R>,
    /// Records held locally
    pub total: usize,
    /// Records matching the search
    pub filtered: usize,
    pub page: usize,
    pub page_count: usize,
    /// 1-based index of the first row shown, 0 when empty
    pub from: usize,
    pub to: usize,
}

impl<R> PageView<R> {
    pub fn summary(&self) -> String {
        if self.filtered == 0 {
            format!("Showing 0 of {}", self.total)
        } else {
            format!("Showing {}-{} of {}", self.from, self.to, self.filtered)
        }
    }
}

impl<R: Resource> CollectionState<R> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
            selected: BTreeSet::new(),
            dialog_open: false,
            editing: None,
            form: FormValues::defaults(R::schema()),
            form_errors: FieldErrors::new(),
            submit_error: None,
            submitting: false,
            notices: Notices::default(),
        }
    }

    pub fn list_query(&self) -> ListQuery {
        ListQuery {
            search: Some(self.search.trim().to_string()).filter(|s| !s.is_empty()),
        }
    }

    pub fn find(&self, id: &R::Id) -> Option<&R> {
        self.items.iter().find(|r| &r.id() == id)
    }

    /// Replace the list wholesale after a fetch
    pub fn replace_items(&mut self, items: Vec<R>) {
        self.items = items;
        let ids: BTreeSet<R::Id> = self.items.iter().map(Resource::id).collect();
        self.selected.retain(|id| ids.contains(id));
        self.clamp_page();
    }

    /// Swap in an updated record; unknown ids are ignored
    pub fn patch(&mut self, updated: R) {
        let id = updated.id();
        if let Some(slot) = self.items.iter_mut().find(|r| r.id() == id) {
            *slot = updated;
        }
    }

    pub fn remove(&mut self, id: &R::Id) {
        self.items.retain(|r| &r.id() != id);
        self.selected.remove(id);
        self.clamp_page();
    }

    pub fn remove_many(&mut self, ids: &[R::Id]) {
        self.items.retain(|r| !ids.contains(&r.id()));
        for id in ids {
            self.selected.remove(id);
        }
        self.clamp_page();
    }

    /// Records whose display text contains the search, case-insensitively
    pub fn filtered(&self) -> Vec<&R> {
        let needle = self.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|r| needle.is_empty() || r.display_text().to_lowercase().contains(&needle))
            .collect()
    }

    fn page_count_for(&self, filtered: usize) -> usize {
        filtered.div_ceil(self.page_size).max(1)
    }

    fn clamp_page(&mut self) {
        let count = self.page_count_for(self.filtered().len());
        self.page = self.page.clamp(1, count);
    }

    pub fn page_view(&self) -> PageView<R> {
        let filtered = self.filtered();
        let page_count = self.page_count_for(filtered.len());
        let page = self.page.clamp(1, page_count);
        let start = (page - 1) * self.page_size;
        let rows: Vec<R> = filtered.iter().skip(start).take(self.page_size).map(|r| (*r).clone()).collect();
        let (from, to) = if rows.is_empty() { (0, 0) } else { (start + 1, start + rows.len()) };

        PageView {
            total: self.items.len(),
            filtered: filtered.len(),
            page,
            page_count,
            from,
            to,
            rows,
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn toggle_select(&mut self, id: R::Id) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn select_all_visible(&mut self) {
        let ids: Vec<R::Id> = self.page_view().rows.iter().map(Resource::id).collect();
        self.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_ids(&self) -> Vec<R::Id> {
        self.selected.iter().cloned().collect()
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.form = FormValues::defaults(R::schema());
        self.reset_form_feedback();
        self.dialog_open = true;
    }

    pub fn open_edit(&mut self, record: R) {
        self.form = record.to_form();
        self.editing = Some(record);
        self.reset_form_feedback();
        self.dialog_open = true;
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
        self.editing = None;
        self.submitting = false;
        self.reset_form_feedback();
    }

    fn reset_form_feedback(&mut self) {
        self.form_errors.clear();
        self.submit_error = None;
    }
}
