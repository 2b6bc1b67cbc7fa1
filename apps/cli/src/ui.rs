use std::time::Duration;

use console::style;
use docreel_core::{Notification, ProcessingStatus, Severity, clamp_progress};
use indicatif::{ProgressBar, ProgressStyle};

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Short summary of the steps for the progress bar message.
pub fn steps_summary(status: &ProcessingStatus) -> String {
    if status.steps.is_empty() {
        return status.status.to_string();
    }
    status
        .steps
        .iter()
        .map(|s| format!("{}: {}", s.name, s.status))
        .collect::<Vec<_>>()
        .join(" · ")
}

pub fn update_progress(pb: &ProgressBar, status: &ProcessingStatus) {
    pb.set_position(clamp_progress(status.progress).round() as u64);
    pb.set_message(steps_summary(status));
}

pub fn print_banner() {
    println!(
        "\n{}  {}\n",
        style("docreel").cyan().bold(),
        style("Document to Video").dim()
    );
}

pub fn print_notification(notification: &Notification) {
    match notification.severity() {
        Severity::Success => println!(
            "{} {}",
            style("✓").green().bold(),
            notification.message()
        ),
        Severity::Error => eprintln!(
            "{} {}",
            style("✗").red().bold(),
            style(notification.message()).red()
        ),
    }
}
