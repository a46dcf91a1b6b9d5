//! Job Dispatcher — owns the job lifecycle.
//!
//! `submit` is the synchronous half: it mints a job id, records
//! `processing`, and spawns exactly one execution unit before returning.
//! The execution unit runs the analysis off the request path and writes the
//! terminal state. Per-job state lives under keys scoped by the job id, and
//! all writes for one job come from that single unit in a fixed order, so no
//! two writers ever contend on a key.
//!
//! Write ordering on success is result first, then `completed` — a reader
//! that observes `completed` must be able to fetch the result (modulo TTL
//! expiry, which the Status API tolerates).

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::AnalysisClient;
use crate::jobs::store::{JobStatus, JobStore, StoreError};

/// Spawns and tracks analysis jobs. Cloning shares the underlying store and
/// analysis client.
#[derive(Clone)]
pub struct JobDispatcher {
    store: Arc<dyn JobStore>,
    analysis: AnalysisClient,
}

impl JobDispatcher {
    pub fn new(store: Arc<dyn JobStore>, analysis: AnalysisClient) -> Self {
        Self { store, analysis }
    }

    /// Accepts a job: assigns a fresh id, records `processing`, and spawns
    /// the execution unit. Returns as soon as the status write lands.
    ///
    /// Identical submissions are not deduplicated; each call produces an
    /// independent job. The returned handle resolves when the execution unit
    /// finishes; callers that only need fire-and-forget may drop it.
    pub async fn submit(
        &self,
        resume_text: String,
        job_description: String,
    ) -> Result<(String, JoinHandle<()>), StoreError> {
        let job_id = Uuid::new_v4().to_string();
        self.store
            .set_status(&job_id, &JobStatus::Processing)
            .await?;

        info!("Job {job_id} accepted, spawning analysis");

        let store = Arc::clone(&self.store);
        let analysis = self.analysis.clone();
        let id = job_id.clone();
        let handle = tokio::spawn(async move {
            execute_job(store, analysis, id, resume_text, job_description).await;
        });

        Ok((job_id, handle))
    }
}

/// One job's execution unit. Runs to a terminal state; never retries, never
/// propagates an error to a caller — failures become the job's `error:`
/// status, observable only through the Status API.
async fn execute_job(
    store: Arc<dyn JobStore>,
    analysis: AnalysisClient,
    job_id: String,
    resume_text: String,
    job_description: String,
) {
    match analysis.analyze(&resume_text, &job_description).await {
        Ok(scorecard) => {
            // Result before status: a `completed` status with no result must
            // only ever be a TTL artifact, never a write-order artifact.
            if let Err(e) = store.set_result(&job_id, &scorecard).await {
                error!("Job {job_id}: failed to store result: {e}");
                record_failure(&store, &job_id, format!("Failed to store result: {e}")).await;
                return;
            }
            if let Err(e) = store.set_status(&job_id, &JobStatus::Completed).await {
                error!("Job {job_id}: failed to store completed status: {e}");
                return;
            }
            info!("Job {job_id} completed");
        }
        Err(e) => {
            info!("Job {job_id} failed: {e}");
            record_failure(&store, &job_id, e.to_string()).await;
        }
    }
}

async fn record_failure(store: &Arc<dyn JobStore>, job_id: &str, message: String) {
    if let Err(e) = store.set_status(job_id, &JobStatus::Error(message)).await {
        // Nothing left to do; the job will read as stuck in `processing`
        // until its keys expire.
        error!("Job {job_id}: failed to store error status: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio::sync::Notify;

    use super::*;
    use crate::jobs::store::memory::MemoryJobStore;
    use crate::llm_client::{LlmError, TextGenerator};

    fn scorecard_text() -> String {
        json!({
            "searchability": {"score": 90},
            "hard_skills": {"score": 85},
            "soft_skills": {"score": 80},
            "recruiter_tips": {"score": 70},
            "overall": {"total_score": 82}
        })
        .to_string()
    }

    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    /// Blocks until released, so a test can observe the `processing` state.
    struct GatedGenerator {
        gate: Arc<Notify>,
        reply: String,
    }

    #[async_trait]
    impl TextGenerator for GatedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.gate.notified().await;
            Ok(self.reply.clone())
        }
    }

    fn dispatcher_with(generator: Arc<dyn TextGenerator>) -> (JobDispatcher, Arc<MemoryJobStore>) {
        let store = Arc::new(MemoryJobStore::default());
        let dispatcher = JobDispatcher::new(
            Arc::clone(&store) as Arc<dyn JobStore>,
            AnalysisClient::new(generator),
        );
        (dispatcher, store)
    }

    #[tokio::test]
    async fn submit_returns_distinct_ids_for_identical_inputs() {
        let (dispatcher, _store) = dispatcher_with(Arc::new(FixedGenerator(scorecard_text())));
        let mut ids = HashSet::new();
        for _ in 0..5 {
            let (id, handle) = dispatcher
                .submit("resume".to_string(), "jd".to_string())
                .await
                .unwrap();
            handle.await.unwrap();
            assert!(ids.insert(id), "job id reused");
        }
    }

    #[tokio::test]
    async fn status_reads_processing_until_analysis_finishes() {
        let gate = Arc::new(Notify::new());
        let (dispatcher, store) = dispatcher_with(Arc::new(GatedGenerator {
            gate: Arc::clone(&gate),
            reply: scorecard_text(),
        }));

        let (job_id, handle) = dispatcher
            .submit("resume".to_string(), "jd".to_string())
            .await
            .unwrap();

        assert_eq!(
            store.get_status(&job_id).await.unwrap(),
            Some(JobStatus::Processing)
        );
        assert!(store.get_result(&job_id).await.unwrap().is_none());

        gate.notify_one();
        handle.await.unwrap();

        assert_eq!(
            store.get_status(&job_id).await.unwrap(),
            Some(JobStatus::Completed)
        );
    }

    #[tokio::test]
    async fn successful_job_writes_result_before_completed_status() {
        let (dispatcher, store) = dispatcher_with(Arc::new(FixedGenerator(scorecard_text())));
        let (job_id, handle) = dispatcher
            .submit("resume".to_string(), "jd".to_string())
            .await
            .unwrap();
        handle.await.unwrap();

        let result: Value = store.get_result(&job_id).await.unwrap().unwrap();
        assert_eq!(result["overall"]["total_score"], 82);

        let log = store.write_log.lock().unwrap().clone();
        assert_eq!(
            log,
            vec![
                format!("status:{job_id}"),
                format!("result:{job_id}"),
                format!("status:{job_id}"),
            ]
        );
    }

    #[tokio::test]
    async fn failed_job_records_error_status_and_no_result() {
        let (dispatcher, store) = dispatcher_with(Arc::new(FailingGenerator));
        let (job_id, handle) = dispatcher
            .submit("resume".to_string(), "jd".to_string())
            .await
            .unwrap();
        handle.await.unwrap();

        match store.get_status(&job_id).await.unwrap() {
            Some(JobStatus::Error(message)) => {
                assert!(message.contains("Empty response"), "message: {message}")
            }
            other => panic!("expected error status, got {other:?}"),
        }
        assert!(store.get_result(&job_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn incomplete_model_reply_ends_in_error_status() {
        let (dispatcher, store) = dispatcher_with(Arc::new(FixedGenerator(
            json!({"searchability": {}, "hard_skills": {}, "soft_skills": {}, "recruiter_tips": {}})
                .to_string(),
        )));
        let (job_id, handle) = dispatcher
            .submit("resume".to_string(), "jd".to_string())
            .await
            .unwrap();
        handle.await.unwrap();

        match store.get_status(&job_id).await.unwrap() {
            Some(JobStatus::Error(message)) => {
                assert!(message.contains("overall"), "message: {message}")
            }
            other => panic!("expected error status, got {other:?}"),
        }
        assert!(store.get_result(&job_id).await.unwrap().is_none());
    }
}
