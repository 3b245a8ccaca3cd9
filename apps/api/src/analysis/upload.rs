//! Multipart form intake: one resume file plus two optional text fields.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

pub const RESUME_FIELD: &str = "resume";
pub const JOB_ROLE_FIELD: &str = "job_role";
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Everything the form submitted, before validation.
/// Kept separate so the form can be re-rendered with the user's input after an error.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub resume: Option<ResumeFile>,
    pub job_role: Option<String>,
    pub job_description: Option<String>,
}

/// A validated upload, ready for extraction.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub data: Bytes,
    pub job_role: Option<String>,
    pub job_description: Option<String>,
}

impl UploadForm {
    /// `max_bytes` only shapes the message when the request body limit cuts the upload short.
    pub async fn from_multipart(
        multipart: &mut Multipart,
        max_bytes: usize,
    ) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        let to_app_error = |e: MultipartError| multipart_error(e, max_bytes);

        while let Some(field) = multipart.next_field().await.map_err(to_app_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                RESUME_FIELD => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(to_app_error)?;
                    // browsers send an empty, unnamed part when no file was chosen
                    let nothing_chosen =
                        data.is_empty() && file_name.as_deref().map_or(true, str::is_empty);
                    if !nothing_chosen {
                        form.resume = Some(ResumeFile {
                            file_name,
                            content_type,
                            data,
                        });
                    }
                }
                JOB_ROLE_FIELD => {
                    form.job_role = non_blank(field.text().await.map_err(to_app_error)?);
                }
                JOB_DESCRIPTION_FIELD => {
                    form.job_description =
                        non_blank(field.text().await.map_err(to_app_error)?);
                }
                other => debug!("Ignoring unknown form field '{other}'"),
            }
        }

        Ok(form)
    }

    /// Checks presence, size and type of the resume file.
    pub fn validate(&self, max_bytes: usize) -> Result<ResumeUpload, AppError> {
        let file = self.resume.as_ref().ok_or_else(|| {
            AppError::Validation("Please upload a resume file to analyze.".to_string())
        })?;

        if file.data.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(size_limit_message(max_bytes)));
        }

        if !is_pdf(file) {
            return Err(AppError::UnsupportedMedia(
                "Unsupported file type. Please upload a PDF file.".to_string(),
            ));
        }

        Ok(ResumeUpload {
            file_name: file.file_name.clone(),
            data: file.data.clone(),
            job_role: self.job_role.clone(),
            job_description: self.job_description.clone(),
        })
    }
}

fn is_pdf(file: &ResumeFile) -> bool {
    let declared_pdf = file
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE));
    let named_pdf = file
        .file_name
        .as_deref()
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));
    declared_pdf || named_pdf
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn size_limit_message(max_bytes: usize) -> String {
    format!(
        "File size exceeds {}MB limit. Please upload a smaller file.",
        max_bytes / (1024 * 1024)
    )
}

fn multipart_error(e: MultipartError, max_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(size_limit_message(max_bytes))
    } else {
        AppError::Validation(format!("Invalid form submission: {}", e.body_text()))
    }
}
