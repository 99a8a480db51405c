//! The store seam: the remote table the repository reads from and writes to.

use crate::domain::feedback::{FeedbackRecord, NewFeedback};
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a [`FeedbackStore`] adapter.
///
/// Messages may carry adapter detail; they are meant for logs, not end users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Transport, authentication or server-side failure.
    #[error("feedback store unavailable: {message}")]
    Unavailable { message: String },
    /// The store refused the row (constraint violation).
    #[error("feedback store rejected the write: {message}")]
    Rejected { message: String },
    /// The table name cannot be used safely.
    #[error("invalid feedback table name: {0:?}")]
    InvalidTable(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        StoreError::Rejected {
            message: message.into(),
        }
    }
}

/// Create/read access to a feedback table.
///
/// Implementations assign `id` and `created_at` on insert and return rows
/// newest first. Inserts are all-or-nothing.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Returns every row of `table`, ordered by `created_at` descending.
    async fn list(&self, table: &str) -> Result<Vec<FeedbackRecord>, StoreError>;

    /// Inserts one row into `table`.
    async fn create(&self, table: &str, input: &NewFeedback) -> Result<(), StoreError>;

    /// Cheap reachability check used by health probes.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
