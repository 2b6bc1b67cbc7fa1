use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    client::{JobService, UploadFile},
    error::{DocreelError, Result},
    notifications::{Notification, Notifications},
    types::UploadResult,
};

pub const UPLOAD_SUCCEEDED: &str = "File uploaded successfully";
pub const UPLOAD_FAILED: &str = "Failed to upload file";

/// Extensions offered by the file picker. Drops are not checked against it.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    /// Size is read from disk when possible and left at zero otherwise.
    /// Blocks on the metadata call, so async callers use [`Self::open`].
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Self::with_size(path, size)
    }

    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let size = tokio::fs::metadata(&path)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        Self::with_size(path, size)
    }

    fn with_size(path: PathBuf, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self { path, name, size }
    }

    pub async fn read(&self) -> Result<UploadFile> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DocreelError::ReadFile {
                path: self.path.clone(),
                source,
            })?;

        Ok(UploadFile {
            file_name: self.name.clone(),
            bytes,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Completed {
        task_id: String,
        chapters: Vec<String>,
    },
    /// The service answered but gave no task id.
    NoTask,
    Failed(String),
    /// Nothing selected, or an upload is already running.
    NotStarted,
}

impl UploadOutcome {
    pub fn task_id(&self) -> Option<&str> {
        match self {
            UploadOutcome::Completed { task_id, .. } => Some(task_id),
            _ => None,
        }
    }
}

/// State behind the upload card.
#[derive(Debug, Default)]
pub struct FileUpload {
    file: Option<SelectedFile>,
    uploading: bool,
    progress: f32,
}

impl FileUpload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picker and drop both land here. Any file type is taken.
    pub fn select(&mut self, file: SelectedFile) {
        self.file = Some(file);
    }

    pub fn select_path(&mut self, path: &Path) {
        self.select(SelectedFile::from_path(path));
    }

    pub fn clear(&mut self) {
        self.file = None;
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn can_upload(&self) -> bool {
        self.file.is_some() && !self.uploading
    }

    /// Marks an upload as in flight and hands back the file to send.
    pub fn begin(&mut self) -> Option<SelectedFile> {
        if !self.can_upload() {
            return None;
        }
        self.uploading = true;
        self.file.clone()
    }

    /// Settles an attempt. The selection survives whatever happened.
    pub fn finish<E: Display>(
        &mut self,
        result: std::result::Result<UploadResult, E>,
        toasts: &mut Notifications,
    ) -> UploadOutcome {
        self.uploading = false;
        self.progress = 0.0;

        match result {
            Ok(UploadResult {
                task_id: Some(task_id),
                chapters,
            }) => {
                info!(%task_id, chapters = chapters.len(), "upload accepted");
                toasts.push(Notification::success(UPLOAD_SUCCEEDED));
                UploadOutcome::Completed { task_id, chapters }
            }
            Ok(_) => {
                warn!("upload response carried no task id");
                UploadOutcome::NoTask
            }
            Err(e) => {
                warn!(error = %e, "upload failed");
                toasts.push(Notification::error(UPLOAD_FAILED));
                UploadOutcome::Failed(e.to_string())
            }
        }
    }

    /// One best-effort request: no retry, no chunking.
    pub async fn submit<S>(&mut self, service: &S, toasts: &mut Notifications) -> UploadOutcome
    where
        S: JobService + ?Sized,
    {
        let Some(file) = self.begin() else {
            return UploadOutcome::NotStarted;
        };

        let result = match file.read().await {
            Ok(upload) => service.upload(upload).await,
            Err(e) => Err(e),
        };

        self.finish(result, toasts)
    }
}
