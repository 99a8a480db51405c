use crate::app::feedback_repository::SubmitError;
use crate::domain::feedback::DraftFeedback;
use crate::transport::http::types::{json_422, ApiResponse, AppState, SubmitFeedbackRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/feedback",
    responses(
        (status = 200, description = "Feedback records, newest first (empty if the store is unreachable)", body = ApiResponse)
    )
)]
pub async fn list_feedback_handler(State(state): State<AppState>) -> impl IntoResponse {
    let records = state.repository.load_feedback().await;
    match serde_json::to_value(records) {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to encode feedback: {}", e))),
        )
            .into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 201, description = "Feedback stored", body = ApiResponse),
        (status = 400, description = "Validation failed (see `field`)", body = ApiResponse),
        (status = 409, description = "A submission is already in progress", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body or non-numeric rating)", body = ApiResponse),
        (status = 502, description = "The feedback store failed the write", body = ApiResponse)
    )
)]
pub async fn submit_feedback_handler(
    State(state): State<AppState>,
    request: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(
                e,
                "{\"name\": ..., \"location\"?: ..., \"message\": ..., \"rating\": 1-5}",
            )
            .into_response()
        }
    };

    let draft = DraftFeedback::from(request);
    match state.repository.submit(&draft).await {
        Ok(input) => {
            let data = serde_json::json!({
                "name": input.name,
                "location": input.location,
                "message": input.message,
                "rating": input.rating,
            });
            (StatusCode::CREATED, Json(ApiResponse::ok(data))).into_response()
        }
        Err(err) => {
            let status = match err {
                SubmitError::Invalid(_) => StatusCode::BAD_REQUEST,
                SubmitError::InFlight => StatusCode::CONFLICT,
                SubmitError::StoreFailure => StatusCode::BAD_GATEWAY,
            };
            let mut body = ApiResponse::error(err.to_string());
            body.field = err.field();
            (status, Json(body)).into_response()
        }
    }
}
