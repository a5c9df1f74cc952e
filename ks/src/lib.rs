//! KeyStore - durable local key-value slots
//!
//! Each key maps to one JSON record on disk. Writers take an advisory lock on
//! the store directory and replace records atomically (write then rename), so
//! a reader never observes a half-written record.
//!
//! # Layout
//!
//! ```text
//! {store_dir}/
//! ├── .lock
//! ├── roadtrip_destinations.json
//! ├── roadtrip_preferences.json
//! └── roadtrip_plan.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use keystore::KeyStore;
//!
//! let store = KeyStore::open("/tmp/state")?;
//! store.set("greeting", &vec!["hello"])?;
//! let value: Option<Vec<String>> = store.get("greeting")?;
//! store.remove("greeting")?;
//! ```

pub mod cli;
mod error;
mod store;

pub use error::{KeyStoreError, Result};
pub use store::KeyStore;

/// File extension used for every record
pub const RECORD_EXTENSION: &str = "json";

/// Default store location when none is given
pub fn default_store_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("keystore")
}
