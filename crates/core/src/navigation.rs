use serde::{Deserialize, Serialize};

use crate::roles::RoleInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavKey {
    Dashboard,
    MyRequests,
    MyTeam,
    Approvals,
    Purchasing,
    AllRequests,
    UserManagement,
    Settings,
}

/// One candidate tab: a stable key, a label, and a visibility predicate over
/// the resolved role.
#[derive(Clone, Copy)]
pub struct NavEntry {
    pub key: NavKey,
    pub label: &'static str,
    visible: fn(&RoleInfo) -> bool,
}

impl NavEntry {
    pub fn is_visible(&self, role: &RoleInfo) -> bool {
        (self.visible)(role)
    }
}

impl std::fmt::Debug for NavEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavEntry").field("key", &self.key).field("label", &self.label).finish()
    }
}

fn always(_: &RoleInfo) -> bool {
    true
}

/// Candidate entries in display order. Filtering this list is the only way a
/// screen becomes reachable.
pub const CANDIDATES: [NavEntry; 8] = [
    NavEntry { key: NavKey::Dashboard, label: "Dashboard", visible: always },
    NavEntry { key: NavKey::MyRequests, label: "My Requests", visible: always },
    NavEntry { key: NavKey::MyTeam, label: "My Team", visible: |role| role.has_subordinates },
    NavEntry { key: NavKey::Approvals, label: "Approvals", visible: RoleInfo::can_approve },
    NavEntry { key: NavKey::Purchasing, label: "Purchasing", visible: |role| role.can_purchase },
    NavEntry {
        key: NavKey::AllRequests,
        label: "All Requests",
        visible: |role| role.can_view_all_requests,
    },
    NavEntry { key: NavKey::UserManagement, label: "Users", visible: |role| role.is_admin },
    NavEntry { key: NavKey::Settings, label: "Settings", visible: always },
];

pub fn visible_entries(role: &RoleInfo) -> Vec<NavEntry> {
    CANDIDATES.into_iter().filter(|entry| entry.is_visible(role)).collect()
}

/// Resolve the active tab. A previously active key that the current role can
/// no longer see (role changed after re-login) falls back to the dashboard.
pub fn resolve_active(role: &RoleInfo, requested: NavKey) -> NavKey {
    if visible_entries(role).iter().any(|entry| entry.key == requested) {
        requested
    } else {
        NavKey::Dashboard
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardVariant {
    Admin,
    Supervisor,
    Employee,
}

/// Three-way static dispatch for the dashboard tab.
pub fn dashboard_variant(role: &RoleInfo) -> DashboardVariant {
    if role.is_admin {
        DashboardVariant::Admin
    } else if role.has_subordinates {
        DashboardVariant::Supervisor
    } else {
        DashboardVariant::Employee
    }
}
