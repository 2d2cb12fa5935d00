use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use procure_core::domain::request::{Request, RequestStatus, Unit};
use procure_core::filters::FilterOptions;

use crate::error::ApiError;

/// One backend page. `next` is the absolute URL of the following page, or
/// absent on the last one.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// Which backing list a screen reads. The backend scopes `requests/` by the
/// caller's role, so "mine" and "all" share a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListScope {
    Mine,
    Team,
    Queue,
    All,
}

impl ListScope {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Mine | Self::All => "requests/",
            Self::Team => "requests/team/",
            Self::Queue => "requests/queue/",
        }
    }
}

/// Query parameters understood by the list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub ordering: Option<String>,
    pub statuses: Vec<RequestStatus>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn from_filters(filters: &FilterOptions, page_size: u32) -> Self {
        Self {
            page: None,
            page_size: Some(page_size),
            ordering: Some(filters.ordering_param()),
            statuses: filters.statuses.iter().copied().collect(),
            search: None,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering", ordering.clone()));
        }
        if !self.statuses.is_empty() {
            let joined =
                self.statuses.iter().map(RequestStatus::as_str).collect::<Vec<_>>().join(",");
            pairs.push(("status", joined));
        }
        if let Some(search) = &self.search {
            let trimmed = search.trim();
            if !trimmed.is_empty() {
                pairs.push(("search", trimmed.to_string()));
            }
        }
        pairs
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewRequest {
    pub item: String,
    pub quantity: Decimal,
    pub unit: Unit,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

/// Partial update of a draft or revision-requested request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub pending_approvals: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub completed_this_month: u64,
}

/// HTTP verbs the offline queue can replay. Reads are never queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WriteMethod {
    Post,
    Put,
    Patch,
    Delete,
}

impl WriteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Read seam the request-list view-model depends on.
#[async_trait]
pub trait RequestDirectory: Send + Sync {
    async fn list_requests(
        &self,
        scope: ListScope,
        query: &ListQuery,
    ) -> Result<Page<Request>, ApiError>;

    /// Follow a `next` link returned by a previous page.
    async fn follow_next(&self, next_url: &str) -> Result<Page<Request>, ApiError>;
}

/// Write seam the offline queue drains through.
#[async_trait]
pub trait WriteTransport: Send + Sync {
    async fn replay(
        &self,
        method: WriteMethod,
        path: &str,
        payload: Option<&serde_json::Value>,
    ) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use procure_core::domain::request::RequestStatus;
    use procure_core::filters::{FilterOptions, SortKey, SortOrder};

    use super::{ListQuery, ListScope, Page};

    #[test]
    fn query_pairs_carry_ordering_and_joined_statuses() {
        let mut filters = FilterOptions {
            sort_by: SortKey::UpdatedAt,
            sort_order: SortOrder::Desc,
            ..FilterOptions::default()
        };
        filters.statuses.insert(RequestStatus::Approved);
        filters.statuses.insert(RequestStatus::Pending);

        let query = ListQuery::from_filters(&filters, 20);
        let pairs = query.query_pairs();

        assert!(pairs.contains(&("page_size", "20".to_string())));
        assert!(pairs.contains(&("ordering", "-updated_at".to_string())));
        assert!(pairs.contains(&("status", "pending,approved".to_string())));
    }

    #[test]
    fn blank_search_is_omitted() {
        let query = ListQuery { search: Some("   ".to_string()), ..ListQuery::default() };
        assert!(query.query_pairs().is_empty());
    }

    #[test]
    fn scope_paths_match_the_backend_routes() {
        assert_eq!(ListScope::Mine.path(), "requests/");
        assert_eq!(ListScope::Team.path(), "requests/team/");
        assert_eq!(ListScope::Queue.path(), "requests/queue/");
        assert_eq!(ListScope::All.path(), "requests/");
    }

    #[test]
    fn page_without_next_has_no_more() {
        let page: Page<u32> = Page { results: vec![1, 2], next: None, count: Some(2) };
        assert!(!page.has_more());
    }
}
