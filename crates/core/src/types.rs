use std::fmt;

use serde::{Deserialize, Serialize};

/// Body returned once by the upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(rename = "taskId", alias = "task_id", default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub chapters: Vec<String>,
}

/// Job state as reported by the status endpoint.
///
/// Anything the service sends besides the three known values is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    #[default]
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    /// Only `completed` ends polling. `failed` keeps the loop going.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        match value {
            JobStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Completed,
    Processing,
    Failed,
}

/// A generated video. Nothing populates these yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub duration: String,
    pub status: VideoStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_result_accepts_camel_and_snake_case() {
        let camel: UploadResult = serde_json::from_str(r#"{"taskId":"abc"}"#).unwrap();
        assert_eq!(camel.task_id.as_deref(), Some("abc"));
        assert!(camel.chapters.is_empty());

        let snake: UploadResult =
            serde_json::from_str(r#"{"task_id":"xyz","chapters":["Intro","Outro"]}"#).unwrap();
        assert_eq!(snake.task_id.as_deref(), Some("xyz"));
        assert_eq!(snake.chapters, vec!["Intro", "Outro"]);
    }

    #[test]
    fn upload_result_without_task_id_is_not_an_error() {
        let body: UploadResult = serde_json::from_str(r#"{"detail":"nope"}"#).unwrap();
        assert_eq!(body.task_id, None);
    }

    #[test]
    fn status_defaults_when_fields_are_missing() {
        let status: ProcessingStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status.status, JobStatus::Processing);
        assert_eq!(status.progress, 0.0);
        assert!(status.steps.is_empty());
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status: ProcessingStatus =
            serde_json::from_str(r#"{"status":"queued","progress":5,"steps":[]}"#).unwrap();
        assert_eq!(status.status, JobStatus::Other("queued".into()));
        assert_eq!(status.status.to_string(), "queued");
        assert!(!status.status.is_terminal());
    }

    #[test]
    fn only_completed_is_terminal() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(!JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn video_status_is_lowercase_on_the_wire() {
        let video: Video = serde_json::from_str(
            r#"{"id":"1","title":"Intro","thumbnail":"","duration":"01:30","status":"completed"}"#,
        )
        .unwrap();
        assert_eq!(video.status, VideoStatus::Completed);
    }
}
