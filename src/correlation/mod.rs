pub mod key;
pub mod store;

pub use key::{bucket_timestamp, derive_key, external_key};
pub use store::CorrelationStore;
