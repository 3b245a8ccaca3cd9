//! HTML route handlers: the upload form, the result page and the download endpoint.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::analysis::report::{analyze_resume, download_filename};
use crate::analysis::upload::UploadForm;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::{render, IndexPage, ResultPage};

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&IndexPage {
        error: None,
        job_role: "",
        job_description: "",
        max_upload_mb: state.config.max_upload_mb,
    })
}

/// POST /analyze
///
/// Same pipeline as the JSON API. Failures re-render the form with the
/// error banner and the user's text fields filled back in.
pub async fn handle_analyze_page(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let max_bytes = state.config.max_upload_bytes();
    let form = match UploadForm::from_multipart(&mut multipart, max_bytes).await {
        Ok(form) => form,
        Err(e) => return form_with_error(&state, &UploadForm::default(), e),
    };

    let upload = match form.validate(max_bytes) {
        Ok(upload) => upload,
        Err(e) => return form_with_error(&state, &form, e),
    };

    match analyze_resume(state.model.as_ref(), &upload).await {
        Ok(report) => {
            let page = ResultPage::new(&report, state.config.max_upload_mb);
            Ok(render(&page)?.into_response())
        }
        Err(e) => form_with_error(&state, &form, e),
    }
}

fn form_with_error(
    state: &AppState,
    form: &UploadForm,
    error: AppError,
) -> Result<Response, AppError> {
    let status = error.status();
    let message = error.user_message();
    let page = render(&IndexPage {
        error: Some(&message),
        job_role: form.job_role.as_deref().unwrap_or_default(),
        job_description: form.job_description.as_deref().unwrap_or_default(),
        max_upload_mb: state.config.max_upload_mb,
    })?;
    Ok((status, page).into_response())
}

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    pub analysis: String,
    #[serde(default)]
    pub job_role: Option<String>,
}

/// POST /download
///
/// Echoes the analysis back as a plain-text attachment. Nothing is stored server-side.
/// Browsers submit textarea content with CRLF line breaks; the file keeps the
/// model's `\n` endings.
pub async fn handle_download(Form(form): Form<DownloadForm>) -> Result<Response, AppError> {
    if form.analysis.trim().is_empty() {
        return Err(AppError::Validation(
            "There is no analysis to download.".to_string(),
        ));
    }

    let filename = download_filename(form.job_role.as_deref());
    let disposition = format!("attachment; filename=\"{filename}\"");

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        [(header::CONTENT_DISPOSITION, disposition)],
        form.analysis.replace("\r\n", "\n"),
    )
        .into_response())
}
