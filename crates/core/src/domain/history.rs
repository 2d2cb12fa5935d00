use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::RequestId;
use super::user::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Submitted,
    Approved,
    Rejected,
    RevisionRequested,
    Revised,
    FinalApproved,
    AssignedPurchasing,
    Ordered,
    Delivered,
    Completed,
}

impl ApprovalAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::RevisionRequested => "Revision Requested",
            Self::Revised => "Revised and Resubmitted",
            Self::FinalApproved => "Final Approval",
            Self::AssignedPurchasing => "Assigned to Purchasing",
            Self::Ordered => "Order Placed",
            Self::Delivered => "Delivered",
            Self::Completed => "Request Completed",
        }
    }
}

/// One step of a request's approval trail, newest first as served by the
/// backend history endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalHistoryEntry {
    pub id: i64,
    pub request: RequestId,
    pub user: UserId,
    #[serde(default)]
    pub user_name: String,
    pub action: ApprovalAction,
    /// Level in the approval hierarchy; 1 is the immediate supervisor, 0 is
    /// purchasing or admin action outside the chain.
    pub level: u32,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
