//! Itinerary store error types

use keystore::KeyStoreError;
use thiserror::Error;

use crate::domain::ValidationError;

/// Errors surfaced by store mutations
///
/// Read failures during load are contained in the store and never appear here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open trip storage: {0}")]
    Open(#[source] KeyStoreError),

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("No destination at index {index}; the list has {len} entries")]
    NoSuchDestination { index: usize, len: usize },

    #[error("Failed to save {key}: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: KeyStoreError,
    },
}
