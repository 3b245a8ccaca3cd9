// Server-rendered form and result pages.

pub mod handlers;
pub mod markdown;

use askama::Template;
use axum::response::Html;

use crate::analysis::report::AnalysisReport;
use crate::errors::AppError;
use crate::llm_client::Usage;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
    pub error: Option<&'a str>,
    pub job_role: &'a str,
    pub job_description: &'a str,
    pub max_upload_mb: u64,
}

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultPage<'a> {
    pub warnings: &'a [String],
    pub preview: &'a str,
    pub analysis: &'a str,
    pub analysis_html: String,
    pub usage: Option<Usage>,
    pub job_role: &'a str,
    pub max_upload_mb: u64,
}

impl<'a> ResultPage<'a> {
    pub fn new(report: &'a AnalysisReport, max_upload_mb: u64) -> Self {
        Self {
            warnings: &report.warnings,
            preview: &report.preview,
            analysis: &report.analysis,
            analysis_html: markdown::render_markdown(&report.analysis),
            usage: report.usage,
            job_role: report.job_role.as_deref().unwrap_or_default(),
            max_upload_mb,
        }
    }
}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    page.render()
        .map(Html)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("template render failed: {e}")))
}
