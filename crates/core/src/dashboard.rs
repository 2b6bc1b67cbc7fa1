use std::time::Duration;

use tracing::debug;

use crate::{
    config::DEFAULT_POLL_INTERVAL,
    notifications::Notifications,
    processing::VideoProcessing,
    types::ProcessingStatus,
    upload::{FileUpload, UploadOutcome},
    videos::VideoList,
};

/// Everything one dashboard screen holds. The current task id is the only
/// state shared between the cards, and it lives in memory only.
#[derive(Debug)]
pub struct Dashboard {
    pub upload: FileUpload,
    pub videos: VideoList,
    pub notifications: Notifications,
    processing: Option<VideoProcessing>,
    poll_interval: Duration,
    instantiations: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl Dashboard {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            upload: FileUpload::new(),
            videos: VideoList::new(),
            notifications: Notifications::new(),
            processing: None,
            poll_interval,
            instantiations: 0,
        }
    }

    pub fn current_task_id(&self) -> Option<&str> {
        self.processing.as_ref().map(VideoProcessing::task_id)
    }

    pub fn processing(&self) -> Option<&VideoProcessing> {
        self.processing.as_ref()
    }

    pub fn processing_mut(&mut self) -> Option<&mut VideoProcessing> {
        self.processing.as_mut()
    }

    /// How many processing cards have been created so far.
    pub fn instantiations(&self) -> u64 {
        self.instantiations
    }

    /// Swaps in a fresh processing card for `task_id`.
    pub fn on_upload_complete(&mut self, task_id: impl Into<String>) {
        let task_id = task_id.into();
        debug!(%task_id, "tracking new task");
        self.processing = Some(VideoProcessing::with_interval(task_id, self.poll_interval));
        self.instantiations += 1;
    }

    /// Routes an upload outcome; only a task id starts processing.
    pub fn handle_upload(&mut self, outcome: &UploadOutcome) {
        if let Some(task_id) = outcome.task_id() {
            self.on_upload_complete(task_id);
        }
    }

    /// Applies a status response if it belongs to the current task.
    pub fn apply_status<E: std::fmt::Display>(
        &mut self,
        task_id: &str,
        result: std::result::Result<ProcessingStatus, E>,
    ) -> bool {
        match self.processing.as_mut() {
            Some(processing) if processing.task_id() == task_id => {
                processing.apply(result);
                true
            }
            _ => {
                debug!(%task_id, "dropping status for a task no longer shown");
                false
            }
        }
    }
}
