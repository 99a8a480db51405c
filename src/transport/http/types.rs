use crate::app::feedback_repository::FeedbackRepository;
use crate::domain::feedback::{DraftFeedback, FeedbackField};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<FeedbackRepository>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Form field the error refers to, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FeedbackField>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field: None,
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SubmitFeedbackRequest {
    pub name: String,
    /// Optional; blank or missing is stored as `null`.
    #[serde(default)]
    pub location: Option<String>,
    pub message: String,
    /// Star rating, a whole number from 1 to 5.
    pub rating: f64,
}

/// Whole JSON numbers (`4`, `4.0`) map to their integer value. Anything
/// fractional maps to 0, which the validator rejects as a rating error in its
/// usual field order.
fn whole_rating(rating: f64) -> i64 {
    if rating.fract() == 0.0 {
        // Saturating cast; out-of-range values still fail validation.
        rating as i64
    } else {
        0
    }
}

impl From<SubmitFeedbackRequest> for DraftFeedback {
    fn from(req: SubmitFeedbackRequest) -> Self {
        DraftFeedback {
            name: req.name,
            location: req.location.unwrap_or_default(),
            message: req.message,
            rating: whole_rating(req.rating),
        }
    }
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::error(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}
