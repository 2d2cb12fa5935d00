use std::sync::Arc;

use procure_api::error::ApiError;
use procure_api::types::{ListQuery, ListScope, Page, RequestDirectory};
use procure_core::domain::request::Request;
use procure_core::filters::FilterOptions;

use crate::store::Banner;

/// View-model behind every request list screen (mine / team / approval
/// queue / all). Pages come sorted from the backend; the status set and text
/// query are applied locally to what has already been fetched.
///
/// Failures never escape: a failed fetch surfaces one banner and leaves the
/// previously loaded page on screen. There is no automatic retry.
pub struct RequestListModel {
    directory: Arc<dyn RequestDirectory>,
    scope: ListScope,
    page_size: u32,
    filters: FilterOptions,
    query: String,
    items: Vec<Request>,
    next: Option<String>,
    loading: bool,
    banners: Vec<Banner>,
}

impl RequestListModel {
    pub fn new(directory: Arc<dyn RequestDirectory>, scope: ListScope, page_size: u32) -> Self {
        Self {
            directory,
            scope,
            page_size,
            filters: FilterOptions::default(),
            query: String::new(),
            items: Vec::new(),
            next: None,
            loading: false,
            banners: Vec::new(),
        }
    }

    pub fn filters(&self) -> &FilterOptions {
        &self.filters
    }

    /// New criteria from the filter modal. Sorting lives server-side, so the
    /// caller is expected to `refresh` afterwards.
    pub fn set_filters(&mut self, filters: FilterOptions) {
        self.filters = filters;
    }

    /// Debounced search callback target. Purely local; no fetch.
    pub fn set_query(&mut self, query: String) {
        self.query = query;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    pub fn loaded_count(&self) -> usize {
        self.items.len()
    }

    /// The rows the screen renders: fetched pages with the status set and
    /// text query applied, backend order preserved.
    pub fn visible(&self) -> Vec<&Request> {
        self.filters.apply(&self.items, &self.query)
    }

    /// Drop and refetch the first page with the current criteria.
    pub async fn refresh(&mut self) {
        if self.loading {
            return;
        }
        self.loading = true;

        let query = ListQuery::from_filters(&self.filters, self.page_size);
        match self.directory.list_requests(self.scope, &query).await {
            Ok(page) => self.accept_first_page(page),
            Err(error) => self.surface(error),
        }
        self.loading = false;
    }

    /// Fetch the next page, only when idle and the backend said there is
    /// one. A failure keeps the current pages and the `next` link so the
    /// user can try again.
    pub async fn load_more(&mut self) {
        if self.loading {
            return;
        }
        let Some(next_url) = self.next.clone() else {
            return;
        };
        self.loading = true;

        match self.directory.follow_next(&next_url).await {
            Ok(page) => self.accept_next_page(page),
            Err(error) => self.surface(error),
        }
        self.loading = false;
    }

    pub fn take_banners(&mut self) -> Vec<Banner> {
        std::mem::take(&mut self.banners)
    }

    fn accept_first_page(&mut self, page: Page<Request>) {
        self.items = page.results;
        self.next = page.next;
    }

    fn accept_next_page(&mut self, page: Page<Request>) {
        self.items.extend(page.results);
        self.next = page.next;
    }

    fn surface(&mut self, error: ApiError) {
        tracing::warn!(scope = ?self.scope, %error, "request list fetch failed");
        self.banners.push(Banner::from_api_error(&error));
    }
}
