use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    client::JobService,
    config::DEFAULT_POLL_INTERVAL,
    error::Result,
    types::{JobStatus, ProcessingStatus},
};

/// Progress tracking for one task.
///
/// The loop stops only once the service reports `completed`. A `failed`
/// job keeps being polled, and request errors are swallowed.
#[derive(Debug, Clone)]
pub struct VideoProcessing {
    task_id: String,
    interval: Duration,
    latest: Option<ProcessingStatus>,
    requests: u64,
}

impl VideoProcessing {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self::with_interval(task_id, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(task_id: impl Into<String>, interval: Duration) -> Self {
        Self {
            task_id: task_id.into(),
            interval,
            latest: None,
            requests: 0,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn latest(&self) -> Option<&ProcessingStatus> {
        self.latest.as_ref()
    }

    /// True until the first response arrives.
    pub fn is_loading(&self) -> bool {
        self.latest.is_none()
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn status(&self) -> Option<&JobStatus> {
        self.latest.as_ref().map(|s| &s.status)
    }

    pub fn progress(&self) -> f64 {
        self.latest.as_ref().map(|s| s.progress).unwrap_or(0.0)
    }

    pub fn should_poll(&self) -> bool {
        !self.status().is_some_and(JobStatus::is_terminal)
    }

    pub fn next_delay(&self) -> Option<Duration> {
        self.should_poll().then_some(self.interval)
    }

    /// Records one response. The newest success replaces whatever came
    /// before; a failed request leaves the last status in place.
    pub fn apply<E: std::fmt::Display>(&mut self, result: std::result::Result<ProcessingStatus, E>) {
        self.requests += 1;

        match result {
            Ok(status) => {
                if status.status == JobStatus::Failed && self.status() != Some(&JobStatus::Failed) {
                    warn!(task_id = %self.task_id, "service reports failure, still polling");
                }
                if status.status.is_terminal() {
                    info!(task_id = %self.task_id, "processing completed");
                }
                self.latest = Some(status);
            }
            Err(e) => {
                debug!(task_id = %self.task_id, error = %e, "status request failed");
            }
        }
    }

    pub async fn poll_once<S>(&mut self, service: &S) -> Option<&ProcessingStatus>
    where
        S: JobService + ?Sized,
    {
        let result: Result<ProcessingStatus> = service.status(&self.task_id).await;
        let ok = result.is_ok();
        self.apply(result);
        if ok { self.latest.as_ref() } else { None }
    }

    /// Polls until `completed`, calling `on_update` after every successful
    /// response. The first request goes out immediately.
    pub async fn watch<S, F>(&mut self, service: &S, mut on_update: F) -> ProcessingStatus
    where
        S: JobService + ?Sized,
        F: FnMut(&ProcessingStatus),
    {
        loop {
            if let Some(status) = self.poll_once(service).await {
                on_update(status);
            }

            match self.next_delay() {
                Some(delay) => tokio::time::sleep(delay).await,
                None => break,
            }
        }

        self.latest.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        client::UploadFile,
        error::DocreelError,
        types::{Step, UploadResult},
    };

    /// Replays scripted status responses, then keeps answering with the last.
    struct ScriptedService {
        script: Mutex<VecDeque<Result<ProcessingStatus>>>,
        fallback: ProcessingStatus,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn new(script: Vec<Result<ProcessingStatus>>, fallback: ProcessingStatus) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JobService for ScriptedService {
        async fn upload(&self, _file: UploadFile) -> Result<UploadResult> {
            unreachable!("processing never uploads")
        }

        async fn status(&self, task_id: &str) -> Result<ProcessingStatus> {
            self.calls.lock().unwrap().push(task_id.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(self.fallback.clone()))
        }
    }

    fn status(job: JobStatus, progress: f64) -> ProcessingStatus {
        ProcessingStatus {
            status: job,
            progress,
            steps: vec![Step {
                name: "Script".into(),
                status: "done".into(),
            }],
        }
    }

    fn offline() -> DocreelError {
        DocreelError::IoError(std::io::Error::other("offline"))
    }

    #[test]
    fn polls_until_first_response_and_after_non_terminal_states() {
        let mut processing = VideoProcessing::new("t");
        assert!(processing.is_loading());
        assert_eq!(processing.next_delay(), Some(Duration::from_secs(2)));

        processing.apply::<DocreelError>(Ok(status(JobStatus::Processing, 10.0)));
        assert!(processing.should_poll());

        processing.apply::<DocreelError>(Ok(status(JobStatus::Failed, 10.0)));
        assert!(processing.should_poll());

        processing.apply::<DocreelError>(Ok(status(JobStatus::Completed, 100.0)));
        assert!(!processing.should_poll());
        assert_eq!(processing.next_delay(), None);
    }

    #[test]
    fn request_error_keeps_previous_status() {
        let mut processing = VideoProcessing::new("t");
        processing.apply::<DocreelError>(Ok(status(JobStatus::Processing, 30.0)));

        processing.apply(Err(offline()));

        assert_eq!(processing.progress(), 30.0);
        assert_eq!(processing.requests(), 2);
        assert!(processing.should_poll());
    }

    #[tokio::test]
    async fn watch_stops_after_completed() {
        let service = ScriptedService::new(
            vec![
                Ok(status(JobStatus::Processing, 20.0)),
                Err(offline()),
                Ok(status(JobStatus::Processing, 60.0)),
                Ok(status(JobStatus::Completed, 100.0)),
            ],
            status(JobStatus::Processing, 0.0),
        );
        let mut processing = VideoProcessing::with_interval("task-7", Duration::from_millis(1));
        let mut seen = Vec::new();

        let last = processing
            .watch(&service, |s| seen.push(s.progress))
            .await;

        assert_eq!(last.status, JobStatus::Completed);
        assert_eq!(seen, vec![20.0, 60.0, 100.0]);
        assert_eq!(service.calls(), 4);
        assert!(service.calls.lock().unwrap().iter().all(|t| t == "task-7"));
    }

    #[tokio::test]
    async fn watch_does_not_stop_on_failed() {
        let service = ScriptedService::new(Vec::new(), status(JobStatus::Failed, 50.0));
        let mut processing = VideoProcessing::with_interval("task-8", Duration::from_millis(1));

        let outcome = tokio::time::timeout(
            Duration::from_millis(100),
            processing.watch(&service, |_| {}),
        )
        .await;

        assert!(outcome.is_err(), "polling must continue past a failed status");
        assert!(service.calls() > 1);
    }
}
