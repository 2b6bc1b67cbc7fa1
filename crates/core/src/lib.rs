//! docreel core library
//!
//! Client side of a document-to-video service: upload a document, follow the
//! generation job until it completes, and list what came out.

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod notifications;
pub mod processing;
pub mod types;
pub mod upload;
pub mod videos;

pub use client::{HttpJobService, JobService, UploadFile};
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{DocreelError, Result};
pub use format::{clamp_progress, format_file_size, format_status_readable, format_video_list};
pub use notifications::{Notification, NotificationId, Notifications, Severity};
pub use processing::VideoProcessing;
pub use types::{JobStatus, ProcessingStatus, Step, UploadResult, Video, VideoStatus};
pub use upload::{FileUpload, SelectedFile, UploadOutcome};
pub use videos::VideoList;
