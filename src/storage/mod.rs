//! Persistence adapters for feedback rows.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryFeedbackStore;
pub use postgres::PostgresFeedbackStore;
pub use store::{FeedbackStore, StoreError};

/// True for names safe to splice into SQL as a table name.
pub fn is_plain_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::is_plain_identifier;

    #[test]
    fn plain_identifiers() {
        assert!(is_plain_identifier("testimonials"));
        assert!(is_plain_identifier("_feedback_v2"));
        assert!(!is_plain_identifier(""));
        assert!(!is_plain_identifier("2fast"));
        assert!(!is_plain_identifier("feedback; DROP TABLE users"));
        assert!(!is_plain_identifier("public.feedback"));
    }
}
