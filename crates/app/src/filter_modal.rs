use procure_core::domain::request::RequestStatus;
use procure_core::filters::{FilterOptions, SortKey, SortOrder};

/// Draft capture for the filter sheet. Holds local copies of the caller's
/// criteria until Apply hands them back; closing without Apply discards the
/// draft. The enums make invalid selections unrepresentable, so there is no
/// runtime validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterModal {
    draft: FilterOptions,
}

impl FilterModal {
    pub fn open(current: &FilterOptions) -> Self {
        Self { draft: current.clone() }
    }

    pub fn draft(&self) -> &FilterOptions {
        &self.draft
    }

    pub fn toggle_status(&mut self, status: RequestStatus) {
        if !self.draft.statuses.remove(&status) {
            self.draft.statuses.insert(status);
        }
    }

    pub fn set_sort(&mut self, sort_by: SortKey, sort_order: SortOrder) {
        self.draft.sort_by = sort_by;
        self.draft.sort_order = sort_order;
    }

    /// Back to "everything, newest first".
    pub fn reset(&mut self) {
        self.draft = FilterOptions::default();
    }

    /// Hand the draft to the caller and close.
    pub fn apply<F: FnOnce(FilterOptions)>(self, sink: F) {
        sink(self.draft);
    }
}
