pub mod debounce;
pub mod filter_modal;
pub mod notifier;
pub mod offline;
pub mod request_list;
pub mod storage;
pub mod store;

pub use debounce::SearchDebouncer;
pub use filter_modal::FilterModal;
pub use notifier::{DeviceNotifier, NotificationCenter, NotifierError};
pub use offline::{DrainOutcome, OfflineQueue, OfflineQueueItem};
pub use request_list::RequestListModel;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{AppStore, Banner, BannerKind};
