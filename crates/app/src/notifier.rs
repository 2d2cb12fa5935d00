use async_trait::async_trait;
use thiserror::Error;

use procure_core::notifications::{
    NotificationCategory, NotificationPreferences, QuietHours,
};

use crate::storage::{KeyValueStorage, StorageError};

const PREFS_KEY: &str = "notification_preferences";

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("device notification api failure: {0}")]
    Device(String),
}

/// Device notification collaborator; wrapped, never reimplemented.
#[async_trait]
pub trait DeviceNotifier: Send + Sync {
    async fn permission_granted(&self) -> Result<bool, NotifierError>;
    async fn request_permission(&self) -> Result<bool, NotifierError>;
    async fn send_local(&self, title: &str, body: &str) -> Result<(), NotifierError>;
    async fn clear_badge(&self) -> Result<(), NotifierError>;
    async fn cancel_all(&self) -> Result<(), NotifierError>;
}

/// Preference store mediating between the settings screen and the device
/// notification API. Preferences persist through the key-value storage
/// collaborator.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    preferences: NotificationPreferences,
}

impl NotificationCenter {
    pub async fn load(storage: &dyn KeyValueStorage) -> Result<Self, StorageError> {
        let preferences = match storage.get(PREFS_KEY).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|source| StorageError::Corrupt { key: PREFS_KEY.to_string(), source })?,
            None => NotificationPreferences::default(),
        };
        Ok(Self { preferences })
    }

    pub async fn persist(&self, storage: &dyn KeyValueStorage) -> Result<(), StorageError> {
        let value = serde_json::to_value(&self.preferences)
            .map_err(|source| StorageError::Corrupt { key: PREFS_KEY.to_string(), source })?;
        storage.put(PREFS_KEY, value).await
    }

    pub fn preferences(&self) -> &NotificationPreferences {
        &self.preferences
    }

    pub fn set_push(&mut self, category: NotificationCategory, enabled: bool) {
        self.preferences.toggles_mut(category).push = enabled;
    }

    pub fn set_email(&mut self, category: NotificationCategory, enabled: bool) {
        self.preferences.toggles_mut(category).email = enabled;
    }

    pub fn set_quiet_hours(&mut self, quiet_hours: QuietHours) {
        self.preferences.quiet_hours = quiet_hours;
    }

    /// Make sure we may post notifications, prompting once if needed.
    pub async fn ensure_permission(
        &self,
        notifier: &dyn DeviceNotifier,
    ) -> Result<bool, NotifierError> {
        if notifier.permission_granted().await? {
            return Ok(true);
        }
        notifier.request_permission().await
    }

    /// Fire the settings-screen test notification, honoring toggles and
    /// quiet hours. Returns whether anything was actually posted.
    pub async fn send_test(
        &self,
        notifier: &dyn DeviceNotifier,
        category: NotificationCategory,
        minute_of_day: u16,
    ) -> Result<bool, NotifierError> {
        if !self.preferences.allows_push(category, minute_of_day) {
            return Ok(false);
        }
        if !self.ensure_permission(notifier).await? {
            return Ok(false);
        }
        notifier
            .send_local("Procure", &format!("Test notification: {}", category.label()))
            .await?;
        Ok(true)
    }

    pub async fn clear_badge(&self, notifier: &dyn DeviceNotifier) -> Result<(), NotifierError> {
        notifier.clear_badge().await
    }

    pub async fn cancel_all(&self, notifier: &dyn DeviceNotifier) -> Result<(), NotifierError> {
        notifier.cancel_all().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use procure_core::notifications::{NotificationCategory, QuietHours};

    use crate::storage::MemoryStorage;

    use super::{DeviceNotifier, NotificationCenter, NotifierError};

    #[derive(Default)]
    struct FakeDevice {
        granted: AtomicBool,
        prompted: AtomicUsize,
        sent: AtomicUsize,
    }

    #[async_trait]
    impl DeviceNotifier for FakeDevice {
        async fn permission_granted(&self) -> Result<bool, NotifierError> {
            Ok(self.granted.load(Ordering::SeqCst))
        }

        async fn request_permission(&self) -> Result<bool, NotifierError> {
            self.prompted.fetch_add(1, Ordering::SeqCst);
            self.granted.store(true, Ordering::SeqCst);
            Ok(true)
        }

        async fn send_local(&self, _title: &str, _body: &str) -> Result<(), NotifierError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn clear_badge(&self) -> Result<(), NotifierError> {
            Ok(())
        }

        async fn cancel_all(&self) -> Result<(), NotifierError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn preferences_round_trip_through_storage() {
        let storage = MemoryStorage::new();
        let mut center = NotificationCenter::default();
        center.set_push(NotificationCategory::System, false);
        center.set_quiet_hours(QuietHours { enabled: true, start_minute: 0, end_minute: 60 });
        center.persist(&storage).await.expect("persist");

        let restored = NotificationCenter::load(&storage).await.expect("load");
        assert!(!restored.preferences().toggles(NotificationCategory::System).push);
        assert!(restored.preferences().quiet_hours.enabled);
    }

    #[tokio::test]
    async fn test_notification_prompts_for_permission_once() {
        let device = FakeDevice::default();
        let center = NotificationCenter::default();

        let sent = center
            .send_test(&device, NotificationCategory::Approvals, 12 * 60)
            .await
            .expect("send");

        assert!(sent);
        assert_eq!(device.prompted.load(Ordering::SeqCst), 1);
        assert_eq!(device.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn quiet_hours_suppress_the_test_notification() {
        let device = FakeDevice::default();
        let mut center = NotificationCenter::default();
        center.set_quiet_hours(QuietHours { enabled: true, start_minute: 0, end_minute: 24 * 60 });

        let sent = center
            .send_test(&device, NotificationCategory::Approvals, 12 * 60)
            .await
            .expect("send");

        assert!(!sent);
        assert_eq!(device.sent.load(Ordering::SeqCst), 0);
    }
}
