pub mod config;
pub mod domain;
pub mod errors;
pub mod filters;
pub mod navigation;
pub mod notifications;
pub mod progress;
pub mod roles;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use domain::history::{ApprovalAction, ApprovalHistoryEntry};
pub use domain::request::{Request, RequestId, RequestStatus, Unit};
pub use domain::user::{PasswordResetRequest, PasswordResetStatus, User, UserId};
pub use errors::DomainError;
pub use filters::{FilterOptions, SortKey, SortOrder};
pub use navigation::{DashboardVariant, NavEntry, NavKey};
pub use notifications::{
    CategoryToggles, NotificationCategory, NotificationPreferences, QuietHours,
};
pub use progress::{ProgressColor, StatusProgress};
pub use roles::{Role, RoleInfo};
