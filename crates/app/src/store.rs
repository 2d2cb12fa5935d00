use std::collections::VecDeque;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use uuid::Uuid;

use procure_api::error::ApiError;
use procure_api::types::{WriteMethod, WriteTransport};
use procure_core::domain::user::User;
use procure_core::roles::RoleInfo;

use crate::offline::{DrainOutcome, OfflineQueue};
use crate::storage::{KeyValueStorage, StorageError};

const SESSION_KEY: &str = "session";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Error,
}

/// Transient user-visible notification banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: BannerKind::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: BannerKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: BannerKind::Error, message: message.into() }
    }

    pub fn from_api_error(error: &ApiError) -> Self {
        Self::error(error.user_message())
    }
}

struct Session {
    access: SecretString,
    refresh: SecretString,
    user: User,
    role: RoleInfo,
}

/// The single global client-side store. All mutation goes through the action
/// methods below; there is no other way to touch the slices.
#[derive(Default)]
pub struct AppStore {
    session: Option<Session>,
    queue: OfflineQueue,
    banners: VecDeque<Banner>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- session slice ---

    /// Role capabilities are resolved here, once, and stay fixed until the
    /// next login.
    pub fn begin_session(&mut self, access: SecretString, refresh: SecretString, user: User) {
        let role = RoleInfo::from_user(&user);
        self.session = Some(Session { access, refresh, user, role });
    }

    pub fn end_session(&mut self) {
        self.session = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn role(&self) -> Option<RoleInfo> {
        self.session.as_ref().map(|session| session.role)
    }

    pub fn access_token(&self) -> Option<&SecretString> {
        self.session.as_ref().map(|session| &session.access)
    }

    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.session.as_ref().map(|session| &session.refresh)
    }

    pub async fn persist_session(
        &self,
        storage: &dyn KeyValueStorage,
    ) -> Result<(), StorageError> {
        match &self.session {
            Some(session) => {
                let value = json!({
                    "access": session.access.expose_secret(),
                    "refresh": session.refresh.expose_secret(),
                });
                storage.put(SESSION_KEY, value).await
            }
            None => storage.remove(SESSION_KEY).await,
        }
    }

    /// Stored token pair from the previous run, if any. The user record is
    /// refetched from `auth/me/` before the session is considered live.
    pub async fn stored_tokens(
        storage: &dyn KeyValueStorage,
    ) -> Result<Option<(SecretString, SecretString)>, StorageError> {
        let Some(value) = storage.get(SESSION_KEY).await? else {
            return Ok(None);
        };
        let access = value.get("access").and_then(Value::as_str);
        let refresh = value.get("refresh").and_then(Value::as_str);
        match (access, refresh) {
            (Some(access), Some(refresh)) => Ok(Some((
                SecretString::from(access.to_string()),
                SecretString::from(refresh.to_string()),
            ))),
            _ => Ok(None),
        }
    }

    // --- offline queue slice ---

    /// Handle a failed write: connectivity failures are queued for replay,
    /// everything else only surfaces a banner. Returns the queued item id.
    pub fn record_write_failure(
        &mut self,
        error: &ApiError,
        method: WriteMethod,
        url: impl Into<String>,
        payload: Option<Value>,
    ) -> Option<Uuid> {
        let queued = self.queue.enqueue_if_connectivity(error, method, url, payload);
        self.banners.push_back(Banner::from_api_error(error));
        queued
    }

    /// Connectivity-change handler: one sequential drain pass.
    pub async fn connectivity_restored(&mut self, transport: &dyn WriteTransport) -> DrainOutcome {
        let outcome = self.queue.drain(transport).await;
        if outcome.replayed > 0 {
            self.banners.push_back(Banner::success(format!(
                "{} queued change{} synced",
                outcome.replayed,
                if outcome.replayed == 1 { "" } else { "s" }
            )));
        }
        if let Some(failure) = &outcome.failure {
            self.banners.push_back(Banner::from_api_error(failure));
        }
        outcome
    }

    pub fn pending_writes(&self) -> usize {
        self.queue.pending_count()
    }

    pub fn pending_items(&self) -> &[crate::offline::OfflineQueueItem] {
        self.queue.items()
    }

    pub fn has_pending_writes(&self) -> bool {
        self.queue.has_pending()
    }

    pub fn remove_pending_write(&mut self, id: Uuid) -> bool {
        self.queue.remove(id)
    }

    pub fn clear_pending_writes(&mut self) {
        self.queue.clear();
    }

    pub async fn persist_queue(&self, storage: &dyn KeyValueStorage) -> Result<(), StorageError> {
        self.queue.save(storage).await
    }

    pub async fn restore_queue(
        &mut self,
        storage: &dyn KeyValueStorage,
    ) -> Result<(), StorageError> {
        self.queue = OfflineQueue::load(storage).await?;
        Ok(())
    }

    // --- banners ---

    pub fn push_banner(&mut self, banner: Banner) {
        self.banners.push_back(banner);
    }

    pub fn take_banners(&mut self) -> Vec<Banner> {
        self.banners.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use procure_api::error::ApiError;
    use procure_api::types::WriteMethod;
    use procure_core::domain::user::{User, UserId};
    use procure_core::roles::Role;

    use crate::storage::MemoryStorage;

    use super::{AppStore, BannerKind};

    fn supervisor() -> User {
        User {
            id: UserId(3),
            username: "zeynep.arslan".to_string(),
            first_name: "Zeynep".to_string(),
            last_name: "Arslan".to_string(),
            phone_number: String::new(),
            is_superuser: false,
            has_subordinates: true,
            can_purchase: false,
            can_view_all_requests: false,
            subordinate_count: 4,
            supervisor: None,
        }
    }

    fn tokens() -> (SecretString, SecretString) {
        (
            SecretString::from("access-jwt".to_string()),
            SecretString::from("refresh-jwt".to_string()),
        )
    }

    #[test]
    fn role_is_resolved_once_at_session_start() {
        let mut store = AppStore::new();
        assert!(store.role().is_none());

        let (access, refresh) = tokens();
        store.begin_session(access, refresh, supervisor());

        let role = store.role().expect("role");
        assert_eq!(role.role(), Role::Supervisor);
        assert!(store.is_authenticated());

        store.end_session();
        assert!(store.role().is_none());
    }

    #[test]
    fn business_failure_surfaces_a_banner_without_queueing() {
        let mut store = AppStore::new();
        let error = ApiError::Business { status: 400, message: "reason required".to_string() };

        let queued =
            store.record_write_failure(&error, WriteMethod::Post, "requests/5/reject/", None);

        assert!(queued.is_none());
        assert_eq!(store.pending_writes(), 0);

        let banners = store.take_banners();
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].kind, BannerKind::Error);
        assert_eq!(banners[0].message, "reason required");
    }

    #[test]
    fn connectivity_failure_queues_and_banners() {
        let mut store = AppStore::new();

        let queued = store.record_write_failure(
            &ApiError::Timeout,
            WriteMethod::Post,
            "requests/5/approve/",
            None,
        );

        assert!(queued.is_some());
        assert!(store.has_pending_writes());
        assert_eq!(store.take_banners().len(), 1);
    }

    #[tokio::test]
    async fn tokens_round_trip_through_storage() {
        let storage = MemoryStorage::new();
        let mut store = AppStore::new();
        let (access, refresh) = tokens();
        store.begin_session(access, refresh, supervisor());
        store.persist_session(&storage).await.expect("persist");

        let restored = AppStore::stored_tokens(&storage).await.expect("load");
        assert!(restored.is_some());

        store.end_session();
        store.persist_session(&storage).await.expect("clear");
        assert!(AppStore::stored_tokens(&storage).await.expect("load").is_none());
    }
}
