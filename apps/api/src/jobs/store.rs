//! Job Store — a thin wrapper over an expiring key/value map.
//!
//! One job owns two keys, `status:{job_id}` and `result:{job_id}`, both
//! written with the same fixed TTL. Every write replaces the whole value;
//! there is no read-modify-write. A missing key is a valid outcome meaning
//! "job unknown or expired", never an error.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::Value;
use thiserror::Error;

/// Fixed expiry applied to every status and result write (24 hours).
pub const JOB_TTL_SECS: u64 = 86_400;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Stored result is not valid JSON: {0}")]
    CorruptResult(#[from] serde_json::Error),
}

/// Status of one job. Tagged internally; the string-embedded wire form
/// (`processing`, `completed`, `error:<message>`) exists only at the store
/// and HTTP boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Processing,
    Completed,
    Error(String),
}

impl JobStatus {
    pub fn to_wire(&self) -> String {
        match self {
            JobStatus::Processing => "processing".to_string(),
            JobStatus::Completed => "completed".to_string(),
            JobStatus::Error(message) => format!("error:{message}"),
        }
    }

    pub fn from_wire(s: &str) -> Self {
        match s {
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            other => match other.strip_prefix("error:") {
                Some(message) => JobStatus::Error(message.to_string()),
                None => JobStatus::Error(format!("unrecognized status: {other}")),
            },
        }
    }
}

/// Key/value access to job state. Implemented over Redis in production and
/// over a hash map in tests.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn set_status(&self, job_id: &str, status: &JobStatus) -> Result<(), StoreError>;
    async fn get_status(&self, job_id: &str) -> Result<Option<JobStatus>, StoreError>;
    async fn set_result(&self, job_id: &str, result: &Value) -> Result<(), StoreError>;
    async fn get_result(&self, job_id: &str) -> Result<Option<Value>, StoreError>;
}

fn status_key(job_id: &str) -> String {
    format!("status:{job_id}")
}

fn result_key(job_id: &str) -> String {
    format!("result:{job_id}")
}

/// Production store backed by Redis. `ConnectionManager` multiplexes and
/// reconnects internally, so the store is cheap to clone into spawned jobs.
#[derive(Clone)]
pub struct RedisJobStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisJobStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl JobStore for RedisJobStore {
    async fn set_status(&self, job_id: &str, status: &JobStatus) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(status_key(job_id), status.to_wire(), JOB_TTL_SECS)
            .await?;
        Ok(())
    }

    async fn get_status(&self, job_id: &str) -> Result<Option<JobStatus>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(status_key(job_id)).await?;
        Ok(raw.map(|s| JobStatus::from_wire(&s)))
    }

    async fn set_result(&self, job_id: &str, result: &Value) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(result_key(job_id), result.to_string(), JOB_TTL_SECS)
            .await?;
        Ok(())
    }

    async fn get_result(&self, job_id: &str) -> Result<Option<Value>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(result_key(job_id)).await?;
        match raw {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryJobStore;
    use super::*;
    use serde_json::json;

    #[test]
    fn status_wire_round_trip() {
        for status in [
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Error("boom".to_string()),
        ] {
            assert_eq!(JobStatus::from_wire(&status.to_wire()), status);
        }
    }

    #[test]
    fn error_wire_form_embeds_message() {
        let status = JobStatus::Error("Empty response received".to_string());
        assert_eq!(status.to_wire(), "error:Empty response received");
    }

    #[test]
    fn error_message_may_contain_colons() {
        let status = JobStatus::from_wire("error:API error (status 503): overloaded");
        assert_eq!(
            status,
            JobStatus::Error("API error (status 503): overloaded".to_string())
        );
    }

    #[tokio::test]
    async fn absent_keys_read_as_none() {
        let store = MemoryJobStore::default();
        assert!(store.get_status("nope").await.unwrap().is_none());
        assert!(store.get_result("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn result_round_trips_through_store() {
        let store = MemoryJobStore::default();
        let scorecard = json!({"overall": {"total_score": 88}});
        store.set_result("job-1", &scorecard).await.unwrap();
        assert_eq!(store.get_result("job-1").await.unwrap(), Some(scorecard));
    }
}
