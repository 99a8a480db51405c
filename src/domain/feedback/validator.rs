//! Field-level validation for feedback drafts.
//!
//! The length and rating bounds here are the contract existing stored rows were
//! written under, so they must not drift.

use super::{DraftFeedback, NewFeedback, Rating, MAX_RATING, MIN_RATING};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

pub const NAME_MAX_CHARS: usize = 100;
pub const LOCATION_MAX_CHARS: usize = 100;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 500;

/// Form field a [`ValidationError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackField {
    Name,
    Location,
    Message,
    Rating,
}

impl FeedbackField {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackField::Name => "name",
            FeedbackField::Location => "location",
            FeedbackField::Message => "message",
            FeedbackField::Rating => "rating",
        }
    }
}

impl fmt::Display for FeedbackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first field of a draft that failed validation.
///
/// `reason` is user-facing and shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ValidationError {
    pub field: FeedbackField,
    pub reason: String,
}

impl ValidationError {
    fn new(field: FeedbackField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validates `draft` and returns the normalized input to persist.
///
/// Fields are checked in the order name, location, message, rating and only the
/// first failure is reported. Lengths are counted in characters after trimming.
pub fn validate(draft: &DraftFeedback) -> Result<NewFeedback, ValidationError> {
    let name = draft.name.trim();
    let name_len = name.chars().count();
    if name_len == 0 {
        return Err(ValidationError::new(FeedbackField::Name, "Name is required"));
    }
    if name_len > NAME_MAX_CHARS {
        return Err(ValidationError::new(
            FeedbackField::Name,
            format!("Name must be at most {NAME_MAX_CHARS} characters"),
        ));
    }

    let location = draft.location.trim();
    if location.chars().count() > LOCATION_MAX_CHARS {
        return Err(ValidationError::new(
            FeedbackField::Location,
            format!("Location must be at most {LOCATION_MAX_CHARS} characters"),
        ));
    }

    let message = draft.message.trim();
    let message_len = message.chars().count();
    if message_len < MESSAGE_MIN_CHARS {
        return Err(ValidationError::new(
            FeedbackField::Message,
            format!("Message must be at least {MESSAGE_MIN_CHARS} characters"),
        ));
    }
    if message_len > MESSAGE_MAX_CHARS {
        return Err(ValidationError::new(
            FeedbackField::Message,
            format!("Message must be at most {MESSAGE_MAX_CHARS} characters"),
        ));
    }

    let rating = Rating::try_from(draft.rating).map_err(|_| {
        ValidationError::new(
            FeedbackField::Rating,
            format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
        )
    })?;

    Ok(NewFeedback {
        name: name.to_string(),
        location: (!location.is_empty()).then(|| location.to_string()),
        message: message.to_string(),
        rating,
    })
}
