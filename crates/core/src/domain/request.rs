use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub i64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a procurement request. Transitions are owned by the backend;
/// the client only reflects the status it is handed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Draft,
    Pending,
    InReview,
    RevisionRequested,
    Approved,
    Rejected,
    Purchasing,
    Ordered,
    Delivered,
    Completed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 10] = [
        Self::Draft,
        Self::Pending,
        Self::InReview,
        Self::RevisionRequested,
        Self::Approved,
        Self::Rejected,
        Self::Purchasing,
        Self::Ordered,
        Self::Delivered,
        Self::Completed,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "in_review" => Some(Self::InReview),
            "revision_requested" => Some(Self::RevisionRequested),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "purchasing" => Some(Self::Purchasing),
            "ordered" => Some(Self::Ordered),
            "delivered" => Some(Self::Delivered),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::InReview => "in_review",
            Self::RevisionRequested => "revision_requested",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Purchasing => "purchasing",
            Self::Ordered => "ordered",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending Approval",
            Self::InReview => "Under Review",
            Self::RevisionRequested => "Revision Requested",
            Self::Approved => "Final Approved - Ready for Purchase",
            Self::Rejected => "Rejected",
            Self::Purchasing => "Assigned to Purchasing Team",
            Self::Ordered => "Order Placed",
            Self::Delivered => "Delivered",
            Self::Completed => "Request Completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| DomainError::UnknownStatus(raw.trim().to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Pieces,
    Kg,
    Ton,
    Meter,
    M2,
    M3,
    Liter,
}

impl Unit {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pieces => "Pieces",
            Self::Kg => "Kilograms",
            Self::Ton => "Tons",
            Self::Meter => "Meters",
            Self::M2 => "Square Meters",
            Self::M3 => "Cubic Meters",
            Self::Liter => "Liters",
        }
    }
}

/// A procurement request as returned by the backend list and detail endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub request_number: String,
    pub item: String,
    pub quantity: Decimal,
    pub unit: Unit,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub reason: String,
    pub status: RequestStatus,
    pub created_by: super::user::UserId,
    #[serde(default)]
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revision_count: u32,
    #[serde(default)]
    pub revision_notes: String,
}

impl Request {
    /// Reference point for "days elapsed": submission time, or creation time
    /// for requests that never left draft.
    pub fn age_reference(&self) -> DateTime<Utc> {
        self.submitted_at.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::RequestStatus;

    #[test]
    fn every_status_round_trips_through_parse() {
        for status in RequestStatus::ALL {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(RequestStatus::parse("archived"), None);
        assert_eq!(RequestStatus::parse(""), None);
    }

    #[test]
    fn parse_is_case_and_whitespace_insensitive() {
        assert_eq!(RequestStatus::parse(" In_Review "), Some(RequestStatus::InReview));
    }

    #[test]
    fn from_str_reports_the_offending_status() {
        let error = " archived ".parse::<RequestStatus>().expect_err("unknown status");
        assert_eq!(error.to_string(), "unknown request status `archived`");
        assert_eq!("approved".parse::<RequestStatus>(), Ok(RequestStatus::Approved));
    }

    #[test]
    fn only_rejected_and_completed_are_terminal() {
        let terminal: Vec<_> =
            RequestStatus::ALL.into_iter().filter(RequestStatus::is_terminal).collect();
        assert_eq!(terminal, vec![RequestStatus::Rejected, RequestStatus::Completed]);
    }

    #[test]
    fn wire_format_is_snake_case() {
        let json = serde_json::to_string(&RequestStatus::RevisionRequested).expect("serialize");
        assert_eq!(json, "\"revision_requested\"");
    }
}
