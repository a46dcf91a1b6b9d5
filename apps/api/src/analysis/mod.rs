//! Analysis Client — turns extracted resume text plus a job description into a
//! validated scorecard by way of a single model call.
//!
//! The model is untrusted: its reply may arrive fenced in markdown, may not be
//! JSON at all, and may be missing categories. Normalization (fence stripping)
//! is kept as one isolated step before parsing, and validation only checks the
//! top-level contract; category internals are passed through unchanged.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::{LlmError, TextGenerator};

pub mod prompts;

/// Resume text beyond this many characters is silently dropped before the
/// prompt is built.
pub const MAX_RESUME_CHARS: usize = 10_000;
/// Same bound for the job description.
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 5_000;

/// Top-level keys the model's reply must contain.
pub const REQUIRED_KEYS: [&str; 5] = [
    "searchability",
    "hard_skills",
    "soft_skills",
    "recruiter_tips",
    "overall",
];

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Empty response received from the analysis model")]
    EmptyResponse,

    #[error("Failed to parse AI response as JSON: {source}; problematic text: {text}")]
    Malformed {
        source: serde_json::Error,
        text: String,
    },

    #[error("Missing required keys in response structure: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },
}

/// Client for the resume evaluation call. Cheap to clone; the generator is
/// shared behind an `Arc` so spawned jobs can carry their own handle.
#[derive(Clone)]
pub struct AnalysisClient {
    llm: Arc<dyn TextGenerator>,
}

impl AnalysisClient {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Runs one evaluation of `resume_text` against `job_description`.
    /// Invokes the model exactly once; any failure is final for this call.
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<Value, AnalysisError> {
        let resume_text = truncate_chars(resume_text, MAX_RESUME_CHARS);
        let job_description = truncate_chars(job_description, MAX_JOB_DESCRIPTION_CHARS);

        let prompt = prompts::build_analysis_prompt(resume_text, job_description);
        let raw = self.llm.generate(&prompt).await?;

        debug!("Analysis model returned {} chars", raw.len());
        parse_scorecard(&raw)
    }
}

/// Truncates to at most `max` characters without splitting a UTF-8 sequence.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Normalizes and validates a raw model reply into a scorecard value.
pub fn parse_scorecard(raw: &str) -> Result<Value, AnalysisError> {
    let cleaned = strip_json_fences(raw);
    if cleaned.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let parsed: Value = serde_json::from_str(cleaned).map_err(|source| AnalysisError::Malformed {
        source,
        text: cleaned.to_string(),
    })?;

    let missing: Vec<String> = match parsed.as_object() {
        Some(obj) => REQUIRED_KEYS
            .iter()
            .filter(|k| !obj.contains_key(**k))
            .map(|k| k.to_string())
            .collect(),
        None => REQUIRED_KEYS.iter().map(|k| k.to_string()).collect(),
    };
    if !missing.is_empty() {
        return Err(AnalysisError::Incomplete { missing });
    }

    Ok(parsed)
}

/// Strips markdown code fences from model output, taking the interior of the
/// first fenced segment. Handles a ```json-tagged fence, an untagged fence,
/// and prose surrounding the fence. Unfenced text passes through trimmed.
fn strip_json_fences(text: &str) -> &str {
    if let Some((_, after)) = text.split_once("```json") {
        after.split("```").next().unwrap_or(after).trim()
    } else if let Some((_, after)) = text.split_once("```") {
        after.split("```").next().unwrap_or(after).trim()
    } else {
        text.trim()
    }
}
