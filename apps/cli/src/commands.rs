use std::{
    path::Path,
    time::{Duration, Instant},
};

use anyhow::{Result, bail};
use console::style;
use docreel_core::{
    Dashboard, HttpJobService, JobService, ProcessingStatus, SelectedFile, UploadOutcome,
    VideoList, VideoProcessing, format_file_size, format_status_readable, format_video_list,
};

use crate::ui::{
    create_progress_bar, create_spinner, format_duration, print_notification, update_progress,
};

/// Uploads one file through the dashboard state and reports the outcome.
async fn upload_file(
    dashboard: &mut Dashboard,
    service: &HttpJobService,
    path: &Path,
) -> Result<UploadOutcome> {
    dashboard.upload.select(SelectedFile::open(path).await);
    let Some(file) = dashboard.upload.file() else {
        bail!("no file selected");
    };

    let spinner = create_spinner(&format!(
        "Uploading {} ({})...",
        file.name,
        format_file_size(file.size)
    ));
    let step_start = Instant::now();

    let outcome = dashboard
        .upload
        .submit(service, &mut dashboard.notifications)
        .await;
    spinner.finish_and_clear();

    for notification in dashboard.notifications.drain() {
        print_notification(&notification);
    }

    match &outcome {
        UploadOutcome::Completed { task_id, chapters } => {
            println!(
                "{} Task: {} {}",
                style("✓").green().bold(),
                style(task_id).cyan(),
                style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
            );
            if !chapters.is_empty() {
                println!("{}", style("Chapters:").dim());
                for (i, chapter) in chapters.iter().enumerate() {
                    println!("  {}. {}", i + 1, chapter);
                }
            }
        }
        UploadOutcome::NoTask => {
            println!(
                "{} Service accepted the file but returned no task id",
                style("!").yellow().bold()
            );
        }
        UploadOutcome::Failed(reason) => bail!("upload failed: {reason}"),
        UploadOutcome::NotStarted => bail!("upload did not start"),
    }

    Ok(outcome)
}

async fn watch_processing(
    processing: &mut VideoProcessing,
    service: &HttpJobService,
) -> ProcessingStatus {
    let pb = create_progress_bar();
    pb.set_message("Waiting for status...");
    let start = Instant::now();

    let last = processing
        .watch(service, |status| update_progress(&pb, status))
        .await;

    pb.finish_and_clear();
    println!(
        "{} Processing {} {}",
        style("✓").green().bold(),
        last.status,
        style(format!("[{}]", format_duration(start.elapsed()))).dim()
    );
    last
}

fn print_status(status: &ProcessingStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
    } else {
        println!("{}", style("─".repeat(60)).dim());
        print!("{}", format_status_readable(status));
    }
    Ok(())
}

pub async fn upload(service: &HttpJobService, path: &Path, poll_interval: Duration) -> Result<()> {
    let mut dashboard = Dashboard::new(poll_interval);
    upload_file(&mut dashboard, service, path).await?;
    Ok(())
}

pub async fn status(service: &HttpJobService, task_id: &str, json: bool) -> Result<()> {
    let status = service.status(task_id).await?;
    print_status(&status, json)
}

pub async fn watch(
    service: &HttpJobService,
    task_id: &str,
    poll_interval: Duration,
    json: bool,
) -> Result<()> {
    let mut processing = VideoProcessing::with_interval(task_id, poll_interval);
    let last = watch_processing(&mut processing, service).await;
    print_status(&last, json)
}

/// The whole dashboard flow: upload, then follow the returned task.
pub async fn run(
    service: &HttpJobService,
    path: &Path,
    poll_interval: Duration,
    json: bool,
) -> Result<()> {
    let total_start = Instant::now();
    let mut dashboard = Dashboard::new(poll_interval);

    let outcome = upload_file(&mut dashboard, service, path).await?;
    dashboard.handle_upload(&outcome);

    if let Some(processing) = dashboard.processing_mut() {
        let last = watch_processing(processing, service).await;
        print_status(&last, json)?;
    }

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    print!("{}", format_video_list(&dashboard.videos));
    Ok(())
}

pub fn videos() {
    print!("{}", format_video_list(&VideoList::new()));
}
