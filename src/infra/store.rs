//! Builds the configured feedback store.

use crate::infra::config::{self, StoreBackend};
use crate::storage::{FeedbackStore, InMemoryFeedbackStore, PostgresFeedbackStore};
use std::sync::Arc;

/// Connects the store selected by `FEEDBACK_STORE`, creating `table` when it is
/// PostgreSQL-backed.
pub async fn connect_store(table: &str) -> anyhow::Result<Arc<dyn FeedbackStore>> {
    match config::store_backend()? {
        StoreBackend::Memory => {
            tracing::info!("using in-memory feedback store (data is lost on restart)");
            Ok(Arc::new(InMemoryFeedbackStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config::database_url()?;
            let store =
                PostgresFeedbackStore::connect(&database_url, config::max_connections()?).await?;
            store.ensure_table(table).await?;
            tracing::info!(table, "connected to PostgreSQL feedback store");
            Ok(Arc::new(store))
        }
    }
}
