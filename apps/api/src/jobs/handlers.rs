use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::extract_text;
use crate::jobs::store::JobStatus;
use crate::state::AppState;

/// Uploads larger than this are rejected before extraction.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub job_id: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/analyze
///
/// Multipart fields: `resume` (PDF file) and `jobDescription` (text).
/// Validation and text extraction happen on the request path; the model call
/// does not. On success the response carries a job id to poll.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut resume_bytes: Option<Bytes> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                resume_bytes = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read resume file: {e}"))
                })?);
            }
            "jobDescription" => {
                job_description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job description: {e}"))
                })?);
            }
            _ => {} // unknown fields are ignored
        }
    }

    let (resume_bytes, job_description) = validate_submission(resume_bytes, job_description)?;

    let resume_text = extract_text(resume_bytes)
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let resume_text = validate_extracted_text(resume_text)?;

    let (job_id, _handle) = state
        .dispatcher
        .submit(resume_text, job_description)
        .await?;

    Ok(Json(AnalyzeResponse {
        job_id,
        status: "processing",
    }))
}

/// Field-level submission checks, separated from the multipart plumbing.
/// Ordering matters for error precedence: missing file, then missing
/// description, then size limit.
fn validate_submission(
    resume: Option<Bytes>,
    job_description: Option<String>,
) -> Result<(Bytes, String), AppError> {
    let resume =
        resume.ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;
    let job_description = job_description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No job description provided".to_string()))?;

    if resume.len() > MAX_FILE_BYTES {
        return Err(AppError::Validation("Resume file too large".to_string()));
    }

    Ok((resume, job_description))
}

/// A document that parses but yields no text is a validation failure, not a
/// successful empty result.
fn validate_extracted_text(text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Empty resume text extracted".to_string(),
        ));
    }
    Ok(text)
}

/// GET /api/status/:job_id
///
/// Reads only from the Job Store. A `completed` status whose result key has
/// already expired is reported as completed without a result, not as a
/// failure.
pub async fn handle_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let status = state
        .store
        .get_status(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    let response = match status {
        JobStatus::Processing => StatusResponse {
            status: "processing",
            result: None,
            error: None,
        },
        JobStatus::Error(message) => StatusResponse {
            status: "error",
            result: None,
            error: Some(message),
        },
        JobStatus::Completed => StatusResponse {
            status: "completed",
            result: state.store.get_result(&job_id).await?,
            error: None,
        },
    };

    Ok(Json(response))
}
