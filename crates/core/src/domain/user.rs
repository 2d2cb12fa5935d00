use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated user record as returned by the `auth/me/` endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub has_subordinates: bool,
    #[serde(default)]
    pub can_purchase: bool,
    #[serde(default)]
    pub can_view_all_requests: bool,
    #[serde(default)]
    pub subordinate_count: u32,
    #[serde(default)]
    pub supervisor: Option<UserId>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Backend-owned lifecycle of a supervisor-mediated password reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordResetStatus {
    Pending,
    Approved,
    Rejected,
    Used,
    Expired,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub id: i64,
    pub user: UserId,
    pub supervisor: UserId,
    #[serde(default)]
    pub reason: String,
    pub status: PasswordResetStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::{User, UserId};

    #[test]
    fn full_name_joins_first_and_last() {
        let user = User {
            id: UserId(7),
            username: "ayse.demir".to_string(),
            first_name: "Ayse".to_string(),
            last_name: "Demir".to_string(),
            phone_number: String::new(),
            is_superuser: false,
            has_subordinates: false,
            can_purchase: false,
            can_view_all_requests: false,
            subordinate_count: 0,
            supervisor: None,
        };
        assert_eq!(user.full_name(), "Ayse Demir");
    }
}
