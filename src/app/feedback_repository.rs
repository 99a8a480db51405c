//! The Feedback Repository.
//!
//! Sits between the presentation layer and the feedback store. It is
//! responsible for:
//! 1.  Reading the feedback list newest-first and caching it per table.
//! 2.  Validating drafts before anything reaches the store.
//! 3.  Allowing a single submission in flight at a time.
//! 4.  Refreshing the cached list once a write has been acknowledged.

use crate::domain::feedback::{
    validate, DraftFeedback, FeedbackField, FeedbackRecord, NewFeedback, ValidationError,
};
use crate::storage::{FeedbackStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Shown to visitors whenever the store refuses or fails a write.
pub const GENERIC_SUBMIT_FAILURE: &str = "We couldn't save your feedback right now. Please try again.";

/// Why a submission did not go through. Exactly one per failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The draft failed validation; nothing was sent to the store.
    #[error("{0}")]
    Invalid(ValidationError),
    /// Another submission is still being written.
    #[error("a feedback submission is already in progress")]
    InFlight,
    /// The store failed the write. Details are logged, never shown.
    #[error("{}", GENERIC_SUBMIT_FAILURE)]
    StoreFailure,
}

impl SubmitError {
    /// The offending form field, for validation failures.
    pub fn field(&self) -> Option<FeedbackField> {
        match self {
            SubmitError::Invalid(err) => Some(err.field),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// Reads and writes feedback for one table through a [`FeedbackStore`].
pub struct FeedbackRepository {
    store: Arc<dyn FeedbackStore>,
    table: String,
    /// Last successful list read, keyed by table name.
    cache: RwLock<HashMap<String, Vec<FeedbackRecord>>>,
    /// Bumped on every invalidation, under the cache write lock. A read only
    /// populates the cache if no invalidation happened while it was in flight.
    generation: AtomicU64,
    /// Serializes cold-cache loads so overlapping loads share one store read.
    loading: Mutex<()>,
    /// Held for the whole duration of a submission.
    in_flight: Mutex<()>,
}

impl FeedbackRepository {
    pub fn new(store: Arc<dyn FeedbackStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            cache: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            loading: Mutex::new(()),
            in_flight: Mutex::new(()),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn store(&self) -> &Arc<dyn FeedbackStore> {
        &self.store
    }

    /// Returns the feedback list, newest first.
    ///
    /// Store failures are logged and degrade to an empty list. Failures are not
    /// cached, so calling again retries the read.
    pub async fn load_feedback(&self) -> Vec<FeedbackRecord> {
        match self.try_load_feedback().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(table = %self.table, error = %err, "could not load feedback; showing an empty list");
                Vec::new()
            }
        }
    }

    /// Like [`load_feedback`](Self::load_feedback) but surfaces the store error.
    pub async fn try_load_feedback(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        if let Some(records) = self.cached().await {
            return Ok(records);
        }
        let _loading = self.loading.lock().await;
        // Another load may have filled the cache while we waited.
        if let Some(records) = self.cached().await {
            return Ok(records);
        }
        self.fetch().await
    }

    async fn cached(&self) -> Option<Vec<FeedbackRecord>> {
        self.cache.read().await.get(&self.table).cloned()
    }

    /// Drops the cached list so the next read goes to the store.
    ///
    /// Reads already in flight still return their result to their caller but
    /// no longer populate the cache.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        cache.remove(&self.table);
    }

    /// Invalidates the cached list and reads it again from the store.
    pub async fn refresh(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        self.invalidate().await;
        self.fetch().await
    }

    async fn fetch(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        let started_at = self.generation.load(Ordering::SeqCst);
        let records = self.store.list(&self.table).await?;
        tracing::debug!(table = %self.table, count = records.len(), "loaded feedback");

        let mut cache = self.cache.write().await;
        if self.generation.load(Ordering::SeqCst) == started_at {
            cache.insert(self.table.clone(), records.clone());
        } else {
            tracing::debug!(table = %self.table, "not caching a read that overlapped an invalidation");
        }
        Ok(records)
    }

    /// `Submitting` while a write (and its follow-up refresh) is under way.
    pub fn submission_state(&self) -> SubmissionState {
        match self.in_flight.try_lock() {
            Ok(_) => SubmissionState::Idle,
            Err(_) => SubmissionState::Submitting,
        }
    }

    /// Validates and stores `draft`, resetting it to a blank form on success.
    ///
    /// On any failure the draft is left exactly as it was so the visitor can
    /// retry without retyping.
    pub async fn submit_feedback(&self, draft: &mut DraftFeedback) -> Result<(), SubmitError> {
        self.submit(draft).await?;
        draft.reset();
        Ok(())
    }

    /// Validates and stores `draft`, returning the normalized input that was written.
    pub async fn submit(&self, draft: &DraftFeedback) -> Result<NewFeedback, SubmitError> {
        let input = validate(draft).map_err(SubmitError::Invalid)?;

        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!(table = %self.table, "rejecting submission while another is in flight");
            return Err(SubmitError::InFlight);
        };

        if let Err(err) = self.store.create(&self.table, &input).await {
            tracing::warn!(table = %self.table, error = %err, "feedback submission failed");
            return Err(SubmitError::StoreFailure);
        }
        tracing::info!(table = %self.table, rating = %input.rating, "feedback stored");

        // The write is acknowledged at this point; a failed re-read only leaves
        // the cache empty, and the next load retries it.
        if let Err(err) = self.refresh().await {
            tracing::warn!(table = %self.table, error = %err, "could not refresh feedback after submission");
        }

        Ok(input)
    }
}
