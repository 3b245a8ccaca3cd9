//! The analysis pipeline: extract → prompt → one completion call.

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::extraction::{extract_resume_text, preview, ExtractionError};
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::analysis::upload::ResumeUpload;
use crate::errors::AppError;
use crate::llm_client::{ChatModel, Usage};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Model feedback, Markdown.
    pub analysis: String,
    pub usage: Option<Usage>,
    pub preview: String,
    pub page_count: usize,
    pub warnings: Vec<String>,
    pub job_role: Option<String>,
    pub download_filename: String,
}

pub async fn analyze_resume(
    model: &dyn ChatModel,
    upload: &ResumeUpload,
) -> Result<AnalysisReport, AppError> {
    info!(
        file = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = upload.data.len(),
        "Processing resume"
    );

    // PDF parsing is CPU-bound; keep it off the async executor
    let data = upload.data.clone();
    let extracted = tokio::task::spawn_blocking(move || extract_resume_text(&data))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
        })?
        .map_err(|e| match e {
            ExtractionError::Unreadable(reason) => {
                warn!("Could not read uploaded PDF: {reason}");
                AppError::UnprocessableEntity(
                    "Could not extract text from the file. Please ensure it's a valid PDF."
                        .to_string(),
                )
            }
        })?;

    if !extracted.has_readable_text() {
        return Err(AppError::UnprocessableEntity(
            "The file appears to be empty or contains no readable text.".to_string(),
        ));
    }

    let prompt = build_analysis_prompt(
        &extracted.text,
        upload.job_role.as_deref(),
        upload.job_description.as_deref(),
    );
    let completion = model.complete(ANALYSIS_SYSTEM, &prompt).await?;

    info!(
        pages = extracted.page_count,
        skipped = extracted.warnings.len(),
        "Resume analysis complete"
    );

    Ok(AnalysisReport {
        analysis: completion.text,
        usage: completion.usage,
        preview: preview(&extracted.text),
        page_count: extracted.page_count,
        warnings: extracted.warnings,
        download_filename: download_filename(upload.job_role.as_deref()),
        job_role: upload.job_role.clone(),
    })
}

/// `resume_analysis_<role>.txt`, spaces as underscores; `general` when no role was given.
pub fn download_filename(job_role: Option<&str>) -> String {
    let stem: String = match job_role.map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => role
            .chars()
            .map(|c| match c {
                ' ' | '"' | '\\' | '/' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect(),
        None => "general".to_string(),
    };
    format!("resume_analysis_{stem}.txt")
}
