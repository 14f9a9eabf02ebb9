use axum::extract::{rejection::JsonRejection, State};
use axum::Json;

use crate::error::ApiError;
use crate::services::Feedback;
use crate::state::AppState;

pub const FEEDBACK_CONFIRMATION: &str = "Thank you email sent successfully";

/// POST /feedback - forward a contact form message and thank the sender
pub async fn feedback_post(
    State(state): State<AppState>,
    payload: Result<Json<Feedback>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let Json(feedback) = payload?;

    state.feedback.submit(&feedback).await?;
    Ok(FEEDBACK_CONFIRMATION)
}
