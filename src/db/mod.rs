pub mod codec;
pub mod connection;
pub mod record_store;
pub mod store;
