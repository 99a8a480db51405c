//! Centralized configuration (environment variables + defaults).

use crate::storage::is_plain_identifier;
use anyhow::{anyhow, Context};
use std::net::SocketAddr;

pub const DEFAULT_FEEDBACK_TABLE: &str = "testimonials";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which feedback store the binaries wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> anyhow::Result<String> {
    var("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))
}

/// Table holding feedback rows (default: `testimonials`).
pub fn feedback_table() -> anyhow::Result<String> {
    parse_feedback_table(var("FEEDBACK_TABLE"))
}

/// Pool size for the PostgreSQL store (default: 5, at least 1).
pub fn max_connections() -> anyhow::Result<u32> {
    parse_max_connections(var("DATABASE_MAX_CONNECTIONS"))
}

/// Address the API server listens on (default: `0.0.0.0:3000`).
pub fn bind_addr() -> anyhow::Result<SocketAddr> {
    let raw = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    raw.parse::<SocketAddr>()
        .with_context(|| format!("BIND_ADDR must be a socket address, got {raw:?}"))
}

/// `FEEDBACK_STORE=postgres|memory` (default: postgres).
pub fn store_backend() -> anyhow::Result<StoreBackend> {
    parse_store_backend(var("FEEDBACK_STORE"))
}

fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_feedback_table(raw: Option<String>) -> anyhow::Result<String> {
    let table = raw.unwrap_or_else(|| DEFAULT_FEEDBACK_TABLE.to_string());
    if !is_plain_identifier(&table) {
        return Err(anyhow!(
            "FEEDBACK_TABLE must be a plain identifier (letters, digits, underscores), got {table:?}"
        ));
    }
    Ok(table)
}

fn parse_max_connections(raw: Option<String>) -> anyhow::Result<u32> {
    match raw {
        None => Ok(DEFAULT_MAX_CONNECTIONS),
        Some(v) => Ok(v
            .parse::<u32>()
            .with_context(|| format!("DATABASE_MAX_CONNECTIONS must be a valid u32, got {v:?}"))?
            .max(1)),
    }
}

fn parse_store_backend(raw: Option<String>) -> anyhow::Result<StoreBackend> {
    match raw.as_deref().map(str::to_lowercase).as_deref() {
        None | Some("postgres") => Ok(StoreBackend::Postgres),
        Some("memory") => Ok(StoreBackend::Memory),
        Some(other) => Err(anyhow!(
            "FEEDBACK_STORE must be `postgres` or `memory`, got {other:?}"
        )),
    }
}
