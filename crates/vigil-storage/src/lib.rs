//! # vigil-storage
//!
//! Persistence layer of the pipeline: error records, notifications, and
//! session metadata written through the generic key-value capability
//! under a byte quota, with age-based cleanup. Storage failures never
//! escape; the pipeline degrades to in-memory operation.

pub mod file_store;
pub mod store;

pub use file_store::FileKvStore;
pub use store::ErrorStorage;
