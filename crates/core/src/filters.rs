use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::request::{Request, RequestStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
    Item,
    Status,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Item => "item",
            Self::Status => "status",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// User-chosen list criteria. Ephemeral UI state; never persisted.
///
/// Sorting is delegated to the backend through [`FilterOptions::ordering_param`];
/// the status set and free-text query are applied client-side to pages that
/// have already been fetched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Empty set means "no status filter", not "exclude everything".
    pub statuses: BTreeSet<RequestStatus>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self { statuses: BTreeSet::new(), sort_by: SortKey::CreatedAt, sort_order: SortOrder::Desc }
    }
}

impl FilterOptions {
    /// Backend `ordering` query parameter: `-` prefix selects descending.
    pub fn ordering_param(&self) -> String {
        match self.sort_order {
            SortOrder::Asc => self.sort_by.as_str().to_string(),
            SortOrder::Desc => format!("-{}", self.sort_by.as_str()),
        }
    }

    pub fn matches_status(&self, status: RequestStatus) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&status)
    }

    /// Filter an already-fetched page. Order is preserved; the backend owns
    /// sorting.
    pub fn apply<'a>(&self, requests: &'a [Request], query: &str) -> Vec<&'a Request> {
        requests
            .iter()
            .filter(|request| self.matches_status(request.status))
            .filter(|request| matches_query(request, query))
            .collect()
    }
}

/// Case-insensitive substring search over item, request number, description,
/// and creator name. A blank query matches everything.
pub fn matches_query(request: &Request, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        request.item.as_str(),
        request.request_number.as_str(),
        request.description.as_str(),
        request.created_by_name.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}
