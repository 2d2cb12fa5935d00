use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    RequestUpdates,
    Approvals,
    Purchasing,
    System,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 4] =
        [Self::RequestUpdates, Self::Approvals, Self::Purchasing, Self::System];

    pub fn label(&self) -> &'static str {
        match self {
            Self::RequestUpdates => "Request updates",
            Self::Approvals => "Approvals",
            Self::Purchasing => "Purchasing",
            Self::System => "System",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryToggles {
    pub push: bool,
    pub email: bool,
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self { push: true, email: false }
    }
}

/// Daily do-not-disturb window in minutes of day. The window may wrap past
/// midnight (e.g. 22:00 to 07:00).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub enabled: bool,
    pub start_minute: u16,
    pub end_minute: u16,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self { enabled: false, start_minute: 22 * 60, end_minute: 7 * 60 }
    }
}

impl QuietHours {
    pub fn contains(&self, minute_of_day: u16) -> bool {
        if !self.enabled {
            return false;
        }
        if self.start_minute <= self.end_minute {
            (self.start_minute..self.end_minute).contains(&minute_of_day)
        } else {
            minute_of_day >= self.start_minute || minute_of_day < self.end_minute
        }
    }
}

/// Per-category delivery toggles plus quiet hours. Persisted through the
/// key-value storage collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub request_updates: CategoryToggles,
    pub approvals: CategoryToggles,
    pub purchasing: CategoryToggles,
    pub system: CategoryToggles,
    pub quiet_hours: QuietHours,
}

impl NotificationPreferences {
    pub fn toggles(&self, category: NotificationCategory) -> CategoryToggles {
        match category {
            NotificationCategory::RequestUpdates => self.request_updates,
            NotificationCategory::Approvals => self.approvals,
            NotificationCategory::Purchasing => self.purchasing,
            NotificationCategory::System => self.system,
        }
    }

    pub fn toggles_mut(&mut self, category: NotificationCategory) -> &mut CategoryToggles {
        match category {
            NotificationCategory::RequestUpdates => &mut self.request_updates,
            NotificationCategory::Approvals => &mut self.approvals,
            NotificationCategory::Purchasing => &mut self.purchasing,
            NotificationCategory::System => &mut self.system,
        }
    }

    /// Push delivery decision for a category at a given wall-clock minute.
    pub fn allows_push(&self, category: NotificationCategory, minute_of_day: u16) -> bool {
        self.toggles(category).push && !self.quiet_hours.contains(minute_of_day)
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationCategory, NotificationPreferences, QuietHours};

    #[test]
    fn defaults_enable_push_and_disable_email() {
        let prefs = NotificationPreferences::default();
        for category in NotificationCategory::ALL {
            assert!(prefs.toggles(category).push);
            assert!(!prefs.toggles(category).email);
        }
    }

    #[test]
    fn disabled_quiet_hours_never_match() {
        let quiet = QuietHours { enabled: false, start_minute: 0, end_minute: 24 * 60 };
        assert!(!quiet.contains(12 * 60));
    }

    #[test]
    fn quiet_window_wraps_past_midnight() {
        let quiet = QuietHours { enabled: true, start_minute: 22 * 60, end_minute: 7 * 60 };
        assert!(quiet.contains(23 * 60));
        assert!(quiet.contains(6 * 60));
        assert!(!quiet.contains(12 * 60));
        assert!(!quiet.contains(7 * 60));
    }

    #[test]
    fn quiet_hours_suppress_push_for_enabled_categories() {
        let mut prefs = NotificationPreferences::default();
        prefs.quiet_hours = QuietHours { enabled: true, start_minute: 0, end_minute: 8 * 60 };

        assert!(!prefs.allows_push(NotificationCategory::Approvals, 6 * 60));
        assert!(prefs.allows_push(NotificationCategory::Approvals, 9 * 60));
    }

    #[test]
    fn disabled_category_suppresses_push_outside_quiet_hours() {
        let mut prefs = NotificationPreferences::default();
        prefs.toggles_mut(NotificationCategory::System).push = false;

        assert!(!prefs.allows_push(NotificationCategory::System, 12 * 60));
    }
}
