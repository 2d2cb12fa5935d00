use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use procure_api::error::ApiError;
use procure_api::types::{WriteMethod, WriteTransport};

use crate::storage::{KeyValueStorage, StorageError};

const QUEUE_KEY: &str = "offline_queue";

/// One write that failed for lack of connectivity, waiting for replay.
/// No dependency tracking between items; insertion order is the only order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfflineQueueItem {
    pub id: Uuid,
    pub method: WriteMethod,
    pub url: String,
    #[serde(default)]
    pub payload: Option<Value>,
    pub queued_at: DateTime<Utc>,
}

/// Result of one drain pass.
#[derive(Debug)]
pub struct DrainOutcome {
    pub replayed: usize,
    pub remaining: usize,
    pub failure: Option<ApiError>,
}

/// Append-only log of connectivity-failed writes. Mutation is limited to
/// enqueue, remove, clear, and drain; reads see a snapshot slice.
#[derive(Debug, Default)]
pub struct OfflineQueue {
    items: Vec<OfflineQueueItem>,
}

impl OfflineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[OfflineQueueItem] {
        &self.items
    }

    /// Queue a write if (and only if) the failure was a connectivity one.
    /// Business and auth errors must surface immediately, never replay.
    pub fn enqueue_if_connectivity(
        &mut self,
        error: &ApiError,
        method: WriteMethod,
        url: impl Into<String>,
        payload: Option<Value>,
    ) -> Option<Uuid> {
        if !error.is_connectivity() {
            return None;
        }
        Some(self.enqueue(method, url, payload))
    }

    pub fn enqueue(
        &mut self,
        method: WriteMethod,
        url: impl Into<String>,
        payload: Option<Value>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.items.push(OfflineQueueItem {
            id,
            method,
            url: url.into(),
            payload,
            queued_at: Utc::now(),
        });
        id
    }

    pub fn pending_count(&self) -> usize {
        self.items.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replay queued writes in insertion order. Each success removes its
    /// item; the first failure ends the pass and leaves the remainder queued
    /// for the next connectivity event. No backoff, no retry limit.
    pub async fn drain(&mut self, transport: &dyn WriteTransport) -> DrainOutcome {
        let mut replayed = 0;
        while let Some(item) = self.items.first() {
            match transport.replay(item.method, &item.url, item.payload.as_ref()).await {
                Ok(()) => {
                    tracing::debug!(url = %item.url, "offline write replayed");
                    self.items.remove(0);
                    replayed += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        url = %item.url,
                        remaining = self.items.len(),
                        %error,
                        "offline drain stopped"
                    );
                    return DrainOutcome {
                        replayed,
                        remaining: self.items.len(),
                        failure: Some(error),
                    };
                }
            }
        }
        DrainOutcome { replayed, remaining: 0, failure: None }
    }

    pub async fn load(storage: &dyn KeyValueStorage) -> Result<Self, StorageError> {
        match storage.get(QUEUE_KEY).await? {
            Some(value) => {
                let items = serde_json::from_value(value).map_err(|source| {
                    StorageError::Corrupt { key: QUEUE_KEY.to_string(), source }
                })?;
                Ok(Self { items })
            }
            None => Ok(Self::new()),
        }
    }

    pub async fn save(&self, storage: &dyn KeyValueStorage) -> Result<(), StorageError> {
        let value = serde_json::to_value(&self.items)
            .map_err(|source| StorageError::Corrupt { key: QUEUE_KEY.to_string(), source })?;
        storage.put(QUEUE_KEY, value).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use procure_api::error::ApiError;
    use procure_api::types::{WriteMethod, WriteTransport};

    use crate::storage::MemoryStorage;

    use super::OfflineQueue;

    /// Records replay calls; fails the first `fail_first` of them.
    struct RecordingTransport {
        calls: Mutex<Vec<String>>,
        fail_first: Mutex<usize>,
    }

    impl RecordingTransport {
        fn reliable() -> Self {
            Self { calls: Mutex::new(Vec::new()), fail_first: Mutex::new(0) }
        }

        fn failing_first(n: usize) -> Self {
            Self { calls: Mutex::new(Vec::new()), fail_first: Mutex::new(n) }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl WriteTransport for RecordingTransport {
        async fn replay(
            &self,
            _method: WriteMethod,
            path: &str,
            _payload: Option<&serde_json::Value>,
        ) -> Result<(), ApiError> {
            self.calls.lock().expect("calls lock").push(path.to_string());
            let mut fail_first = self.fail_first.lock().expect("fail lock");
            if *fail_first > 0 {
                *fail_first -= 1;
                return Err(ApiError::Connectivity("still offline".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn only_connectivity_failures_are_enqueued() {
        let mut queue = OfflineQueue::new();

        let queued = queue.enqueue_if_connectivity(
            &ApiError::Timeout,
            WriteMethod::Post,
            "requests/1/approve/",
            None,
        );
        assert!(queued.is_some());

        let skipped = queue.enqueue_if_connectivity(
            &ApiError::Business { status: 400, message: "reason required".to_string() },
            WriteMethod::Post,
            "requests/2/reject/",
            None,
        );
        assert!(skipped.is_none());
        assert_eq!(queue.pending_count(), 1);
    }

    #[tokio::test]
    async fn drain_replays_in_insertion_order_and_empties_the_queue() {
        let mut queue = OfflineQueue::new();
        for i in 0..3 {
            queue.enqueue(WriteMethod::Post, format!("requests/{i}/approve/"), None);
        }

        let transport = RecordingTransport::reliable();
        let outcome = queue.drain(&transport).await;

        assert_eq!(outcome.replayed, 3);
        assert_eq!(outcome.remaining, 0);
        assert!(outcome.failure.is_none());
        assert!(!queue.has_pending());
        assert_eq!(
            transport.calls(),
            vec!["requests/0/approve/", "requests/1/approve/", "requests/2/approve/"]
        );
    }

    #[tokio::test]
    async fn drain_stops_at_the_first_failure_and_keeps_the_rest() {
        let mut queue = OfflineQueue::new();
        queue.enqueue(WriteMethod::Post, "requests/0/approve/", None);
        queue.enqueue(WriteMethod::Post, "requests/1/approve/", None);

        let transport = RecordingTransport::failing_first(1);
        let outcome = queue.drain(&transport).await;

        assert_eq!(outcome.replayed, 0);
        assert_eq!(outcome.remaining, 2);
        assert!(outcome.failure.is_some());
        // The failed item is still at the head for the next pass.
        assert_eq!(transport.calls(), vec!["requests/0/approve/"]);
    }

    #[tokio::test]
    async fn remove_and_clear_manage_individual_items() {
        let mut queue = OfflineQueue::new();
        let id = queue.enqueue(WriteMethod::Delete, "requests/9/", None);
        queue.enqueue(WriteMethod::Post, "requests/10/submit/", Some(json!({})));

        assert!(queue.remove(id));
        assert!(!queue.remove(id));
        assert_eq!(queue.pending_count(), 1);

        queue.clear();
        assert!(!queue.has_pending());
    }

    #[tokio::test]
    async fn queue_round_trips_through_storage() {
        let storage = MemoryStorage::new();
        let mut queue = OfflineQueue::new();
        queue.enqueue(WriteMethod::Patch, "requests/4/", Some(json!({ "item": "Drill" })));
        queue.save(&storage).await.expect("save");

        let restored = OfflineQueue::load(&storage).await.expect("load");
        assert_eq!(restored.pending_count(), 1);
        assert!(restored.has_pending());
    }
}
