pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, RefreshedToken};
pub use error::ApiError;
pub use types::{
    AdminStats, ListQuery, ListScope, NewRequest, Page, RequestDirectory, RequestUpdate,
    TokenPair, WriteMethod, WriteTransport,
};
