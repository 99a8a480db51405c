pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::feedback_repository::{FeedbackRepository, SubmissionState, SubmitError};
pub use domain::feedback::{
    validate, DraftFeedback, FeedbackField, FeedbackRecord, NewFeedback, Rating, ValidationError,
};
pub use storage::{FeedbackStore, InMemoryFeedbackStore, PostgresFeedbackStore, StoreError};
