use crate::{
    types::{ProcessingStatus, Video},
    videos::{EMPTY_LIST_CAPTION, VideoList},
};

/// Format a byte count as megabytes with two decimals
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Clamp service progress into the 0-100 range a progress bar expects
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 100.0)
}

/// Format a processing status as human-readable text
pub fn format_status_readable(status: &ProcessingStatus) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Status: {} ({:.0}%)\n",
        status.status,
        clamp_progress(status.progress)
    ));

    if !status.steps.is_empty() {
        output.push('\n');
        let width = status.steps.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for step in &status.steps {
            output.push_str(&format!("  {:<width$}  {}\n", step.name, step.status));
        }
    }

    output
}

fn format_video_row(video: &Video) -> String {
    format!("{}  {}  [{}]", video.title, video.duration, video.id)
}

pub fn format_video_list(list: &VideoList) -> String {
    if list.is_empty() {
        return format!("{EMPTY_LIST_CAPTION}\n");
    }

    let mut output = String::new();
    for video in list.videos() {
        output.push_str(&format_video_row(video));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobStatus, Step, VideoStatus};

    #[test]
    fn file_size_in_megabytes() {
        assert_eq!(format_file_size(0), "0.00 MB");
        assert_eq!(format_file_size(1_572_864), "1.50 MB");
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(clamp_progress(-3.0), 0.0);
        assert_eq!(clamp_progress(140.0), 100.0);
        assert_eq!(clamp_progress(f64::NAN), 0.0);
    }

    #[test]
    fn status_lists_steps_aligned() {
        let status = ProcessingStatus {
            status: JobStatus::Processing,
            progress: 42.4,
            steps: vec![
                Step {
                    name: "Script".into(),
                    status: "done".into(),
                },
                Step {
                    name: "Voiceover".into(),
                    status: "running".into(),
                },
            ],
        };

        assert_eq!(
            format_status_readable(&status),
            "Status: processing (42%)\n\n  Script     done\n  Voiceover  running\n"
        );
    }

    #[test]
    fn empty_video_list_shows_caption() {
        assert_eq!(format_video_list(&VideoList::new()), "No videos generated yet\n");

        let list = VideoList::from_videos(vec![Video {
            id: "v1".into(),
            title: "Chapter 1".into(),
            thumbnail: String::new(),
            duration: "02:10".into(),
            status: VideoStatus::Completed,
        }]);
        assert_eq!(format_video_list(&list), "Chapter 1  02:10  [v1]\n");
    }
}
