use serde::{Deserialize, Serialize};

use crate::domain::user::User;

/// Closed role classification. Derived exactly once per session from the
/// authenticated user record, never re-derived ad hoc by individual screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Supervisor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Supervisor => "supervisor",
            Self::Admin => "admin",
        }
    }
}

/// Capability flags resolved at login. Immutable until re-login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub is_admin: bool,
    pub has_subordinates: bool,
    pub can_purchase: bool,
    pub can_view_all_requests: bool,
    pub subordinate_count: u32,
}

impl RoleInfo {
    pub fn from_user(user: &User) -> Self {
        Self {
            is_admin: user.is_superuser,
            has_subordinates: user.has_subordinates,
            // Admins carry every capability regardless of group membership.
            can_purchase: user.is_superuser || user.can_purchase,
            can_view_all_requests: user.is_superuser || user.can_view_all_requests,
            subordinate_count: user.subordinate_count,
        }
    }

    pub fn role(&self) -> Role {
        if self.is_admin {
            Role::Admin
        } else if self.has_subordinates {
            Role::Supervisor
        } else {
            Role::Employee
        }
    }

    pub fn can_approve(&self) -> bool {
        self.is_admin || self.has_subordinates
    }
}

impl Default for RoleInfo {
    fn default() -> Self {
        Self {
            is_admin: false,
            has_subordinates: false,
            can_purchase: false,
            can_view_all_requests: false,
            subordinate_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::user::{User, UserId};

    use super::{Role, RoleInfo};

    fn user() -> User {
        User {
            id: UserId(1),
            username: "mehmet.kaya".to_string(),
            first_name: "Mehmet".to_string(),
            last_name: "Kaya".to_string(),
            phone_number: String::new(),
            is_superuser: false,
            has_subordinates: false,
            can_purchase: false,
            can_view_all_requests: false,
            subordinate_count: 0,
            supervisor: Some(UserId(2)),
        }
    }

    #[test]
    fn plain_user_resolves_to_employee() {
        let info = RoleInfo::from_user(&user());
        assert_eq!(info.role(), Role::Employee);
        assert!(!info.can_approve());
    }

    #[test]
    fn subordinates_resolve_to_supervisor() {
        let mut user = user();
        user.has_subordinates = true;
        user.subordinate_count = 3;

        let info = RoleInfo::from_user(&user);
        assert_eq!(info.role(), Role::Supervisor);
        assert!(info.can_approve());
        assert!(!info.can_purchase);
    }

    #[test]
    fn superuser_outranks_supervisor_and_gains_all_capabilities() {
        let mut user = user();
        user.is_superuser = true;
        user.has_subordinates = true;

        let info = RoleInfo::from_user(&user);
        assert_eq!(info.role(), Role::Admin);
        assert!(info.can_purchase);
        assert!(info.can_view_all_requests);
    }
}
