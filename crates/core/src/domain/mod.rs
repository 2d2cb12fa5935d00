pub mod history;
pub mod request;
pub mod user;
