use anyhow::{Context, Result};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Room for multipart boundaries and the two text fields on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if the OpenAI key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub port: u16,
    pub max_upload_mb: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_upload_mb = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .context("MAX_UPLOAD_MB must be a whole number of megabytes")?;
        request_body_limit(max_upload_mb)
            .with_context(|| format!("MAX_UPLOAD_MB is too large: {max_upload_mb}"))?;

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_mb,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Per-file limit. `from_env` rejects values that overflow, so saturation only
    /// matters for configs built by hand.
    pub fn max_upload_bytes(&self) -> usize {
        upload_bytes(self.max_upload_mb).unwrap_or(usize::MAX)
    }

    /// Whole-request limit for the router: the file limit plus form overhead.
    pub fn request_body_limit(&self) -> usize {
        self.max_upload_bytes().saturating_add(FORM_OVERHEAD_BYTES)
    }
}

fn upload_bytes(max_upload_mb: u64) -> Option<usize> {
    max_upload_mb
        .checked_mul(BYTES_PER_MB)
        .and_then(|bytes| usize::try_from(bytes).ok())
}

/// `None` when the limit does not fit in `usize` once the form overhead is added.
fn request_body_limit(max_upload_mb: u64) -> Option<usize> {
    upload_bytes(max_upload_mb)?.checked_add(FORM_OVERHEAD_BYTES)
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}
