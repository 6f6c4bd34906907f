//! Contact form submissions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use muebles_core::inquiry::NewInquiry;
use muebles_core::validation::validate_input;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/inquiries
///
/// Validate and store a contact form submission. Returns 201 with the
/// stored inquiry.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Json(input): Json<NewInquiry>,
) -> AppResult<impl IntoResponse> {
    let input = input.normalized();
    validate_input(&input)?;

    let inquiry = state.inquiries.create(&input).await?;

    tracing::info!(
        inquiry_id = inquiry.id,
        project_type = inquiry.project_type.as_str(),
        "Contact inquiry received",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: inquiry })))
}
