//! Domain model for customer feedback ("testimonials").
//!
//! A feedback entry moves through three shapes:
//! - [`DraftFeedback`]: raw, unsaved form fields as typed by a visitor.
//! - [`NewFeedback`]: a draft that passed [`validate`], trimmed and normalized.
//! - [`FeedbackRecord`]: a persisted row, with `id` and `created_at` assigned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

pub mod validator;

pub use validator::{validate, FeedbackField, ValidationError};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
/// Rating a fresh draft starts with.
pub const DEFAULT_RATING: i64 = MAX_RATING as i64;

/// A star rating, always within `MIN_RATING..=MAX_RATING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating {0} is outside {min}..={max}", min = MIN_RATING, max = MAX_RATING)]
pub struct RatingOutOfRange(pub i64);

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&value) {
            // Range check above guarantees the value fits in a u8.
            Ok(Rating(value as u8))
        } else {
            Err(RatingOutOfRange(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated, persisted feedback entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeedbackRecord {
    pub id: i64,
    pub name: String,
    /// `None` when the visitor left the location blank.
    pub location: Option<String>,
    pub message: String,
    #[schema(value_type = u8, minimum = 1, maximum = 5)]
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// True when the user-supplied fields match `input` (ignores store-assigned fields).
    pub fn matches(&self, input: &NewFeedback) -> bool {
        self.name == input.name
            && self.location == input.location
            && self.message == input.message
            && self.rating == input.rating
    }
}

/// Normalized input handed to the store. Only [`validate`] produces one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFeedback {
    pub name: String,
    pub location: Option<String>,
    pub message: String,
    pub rating: Rating,
}

/// In-progress form data. Never persisted unless it validates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DraftFeedback {
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub message: String,
    pub rating: i64,
}

impl DraftFeedback {
    /// Back to the blank form: empty text fields and a five-star rating.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for DraftFeedback {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: String::new(),
            message: String::new(),
            rating: DEFAULT_RATING,
        }
    }
}
