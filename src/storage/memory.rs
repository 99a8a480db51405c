//! Process-local feedback store, used for local runs and tests.

use crate::domain::feedback::{FeedbackRecord, NewFeedback};
use crate::storage::store::{FeedbackStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryFeedbackStore {
    tables: RwLock<HashMap<String, Vec<FeedbackRecord>>>,
    next_id: AtomicI64,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held in `table`.
    pub async fn len(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, table: &str) -> bool {
        self.len(table).await == 0
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn list(&self, table: &str) -> Result<Vec<FeedbackRecord>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = tables.get(table).cloned().unwrap_or_default();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn create(&self, table: &str, input: &NewFeedback) -> Result<(), StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = FeedbackRecord {
            id,
            name: input.name.clone(),
            location: input.location.clone(),
            message: input.message.clone(),
            rating: input.rating,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(record);
        Ok(())
    }
}
