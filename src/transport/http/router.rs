use crate::domain::feedback::{FeedbackField, FeedbackRecord};
use crate::transport::http::handlers::{feedback, health};
use crate::transport::http::types::{ApiResponse, AppState, SubmitFeedbackRequest};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        feedback::list_feedback_handler,
        feedback::submit_feedback_handler
    ),
    components(schemas(ApiResponse, SubmitFeedbackRequest, FeedbackRecord, FeedbackField))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/feedback",
            get(feedback::list_feedback_handler).post(feedback::submit_feedback_handler),
        )
        .with_state(app_state)
}
