//! JSON route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::analysis::report::{analyze_resume, AnalysisReport};
use crate::analysis::upload::UploadForm;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Multipart fields: `resume` (PDF), `job_role`, `job_description`.
/// Runs the full pipeline and returns the report as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let max_bytes = state.config.max_upload_bytes();
    let form = UploadForm::from_multipart(&mut multipart, max_bytes).await?;
    let upload = form.validate(max_bytes)?;
    let report = analyze_resume(state.model.as_ref(), &upload).await?;
    Ok(Json(report))
}
