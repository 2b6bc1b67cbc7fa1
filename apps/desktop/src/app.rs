use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use docreel_core::{
    Config, Dashboard, HttpJobService, JobService, Notification, NotificationId,
    ProcessingStatus, SelectedFile, Severity, UploadResult, VideoProcessing, clamp_progress,
    format_file_size, upload::ACCEPTED_EXTENSIONS, videos::EMPTY_LIST_CAPTION,
};
use iced::{
    Element, Length, Subscription, Task, event,
    widget::{Column, button, column, container, progress_bar, row, scrollable, text},
    window,
};
use tracing::{debug, error};

const TOAST_TICK: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub enum Message {
    FileDropped(PathBuf),
    Browse,
    FilePicked(Option<PathBuf>),
    ClearFile,
    Upload,
    Uploaded(Result<UploadResult, String>),
    PollTick,
    StatusFetched {
        task_id: String,
        result: Result<ProcessingStatus, String>,
    },
    DismissNotification(NotificationId),
    NotificationTick,
}

pub struct App {
    service: Option<HttpJobService>,
    dashboard: Dashboard,
    poll_in_flight: bool,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let (config, warning) = match Config::load() {
            Ok(config) => (config, None),
            Err(e) => {
                error!(error = %e, "falling back to default configuration");
                (
                    Config::default(),
                    Some(Notification::error(format!("Configuration ignored: {e}"))),
                )
            }
        };

        let mut app = Self::with_config(config);
        if let Some(warning) = warning {
            app.dashboard.notifications.push(warning);
        }
        (app, Task::none())
    }

    pub fn with_config(config: Config) -> Self {
        let mut dashboard = Dashboard::new(config.poll_interval);

        let service = match HttpJobService::new(&config) {
            Ok(service) => Some(service),
            Err(e) => {
                error!(error = %e, "could not build HTTP client");
                dashboard
                    .notifications
                    .push(Notification::error("Video service unavailable"));
                None
            }
        };

        Self {
            service,
            dashboard,
            poll_in_flight: false,
        }
    }

    pub fn title(&self) -> String {
        match self.dashboard.current_task_id() {
            Some(task_id) => format!("docreel - {task_id}"),
            None => "docreel".to_string(),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FileDropped(path) | Message::FilePicked(Some(path)) => {
                self.dashboard.upload.select_path(&path);
                Task::none()
            }
            Message::FilePicked(None) => Task::none(),
            Message::Browse => Task::perform(pick_file(), Message::FilePicked),
            Message::ClearFile => {
                if !self.dashboard.upload.is_uploading() {
                    self.dashboard.upload.clear();
                }
                Task::none()
            }
            Message::Upload => {
                let Some(service) = self.service.clone() else {
                    self.dashboard
                        .notifications
                        .push(Notification::error(docreel_core::upload::UPLOAD_FAILED));
                    return Task::none();
                };
                match self.dashboard.upload.begin() {
                    Some(file) => Task::perform(send_file(service, file), Message::Uploaded),
                    None => Task::none(),
                }
            }
            Message::Uploaded(result) => {
                let outcome = self
                    .dashboard
                    .upload
                    .finish(result, &mut self.dashboard.notifications);
                self.dashboard.handle_upload(&outcome);

                if outcome.task_id().is_some() {
                    self.poll_in_flight = false;
                    return self.fetch_status();
                }
                Task::none()
            }
            Message::PollTick => self.fetch_status(),
            Message::StatusFetched { task_id, result } => {
                if self.dashboard.apply_status(&task_id, result) {
                    self.poll_in_flight = false;
                }
                Task::none()
            }
            Message::DismissNotification(id) => {
                self.dashboard.notifications.dismiss(id);
                Task::none()
            }
            Message::NotificationTick => {
                self.dashboard.notifications.tick(Instant::now());
                Task::none()
            }
        }
    }

    /// One status request for the current task, unless one is already out.
    fn fetch_status(&mut self) -> Task<Message> {
        let (Some(service), Some(processing)) = (self.service.clone(), self.dashboard.processing())
        else {
            return Task::none();
        };
        if !processing.should_poll() || self.poll_in_flight {
            return Task::none();
        }

        self.poll_in_flight = true;
        let task_id = processing.task_id().to_string();
        debug!(%task_id, "polling status");
        Task::perform(fetch_status(service, task_id), |(task_id, result)| {
            Message::StatusFetched { task_id, result }
        })
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            _ => None,
        })];

        if let Some(processing) = self.dashboard.processing()
            && processing.should_poll()
        {
            subscriptions.push(iced::time::every(processing.interval()).map(|_| Message::PollTick));
        }

        if !self.dashboard.notifications.is_empty() {
            subscriptions.push(iced::time::every(TOAST_TICK).map(|_| Message::NotificationTick));
        }

        Subscription::batch(subscriptions)
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut content = Column::new()
            .spacing(24)
            .padding(24)
            .width(Length::Fill)
            .push(text("Dashboard").size(30))
            .push(self.view_upload());

        if let Some(processing) = self.dashboard.processing() {
            content = content.push(view_processing(processing));
        }

        content = content.push(self.view_videos());

        column![self.view_notifications(), scrollable(content)]
            .spacing(8)
            .into()
    }

    fn view_upload(&self) -> Element<'_, Message> {
        let upload = &self.dashboard.upload;

        let drop_zone: Element<'_, Message> = match upload.file() {
            Some(file) => column![
                text(&file.name).size(16),
                text(format_file_size(file.size)).size(12),
            ]
            .spacing(4)
            .into(),
            None => column![
                text("Drop your file here or click to browse").size(16),
                text("Supports PDF and DOC files").size(12),
            ]
            .spacing(4)
            .into(),
        };

        let mut card = Column::new().spacing(16).push(drop_zone).push(
            row![
                button("Browse...").on_press(Message::Browse),
                button("Clear").on_press_maybe(
                    (upload.file().is_some() && !upload.is_uploading()).then_some(Message::ClearFile)
                ),
            ]
            .spacing(8),
        );

        if upload.file().is_some() {
            let label = if upload.is_uploading() {
                "Uploading..."
            } else {
                "Upload and Process"
            };
            card = card
                .push(progress_bar(0.0..=100.0, upload.progress()))
                .push(
                    button(label)
                        .width(Length::Fill)
                        .on_press_maybe(upload.can_upload().then_some(Message::Upload)),
                );
        }

        card_container(card.into())
    }

    fn view_videos(&self) -> Element<'_, Message> {
        let mut list = Column::new()
            .spacing(12)
            .push(text("Generated Videos").size(20));

        if self.dashboard.videos.is_empty() {
            list = list.push(text(EMPTY_LIST_CAPTION).size(12));
        }

        for video in self.dashboard.videos.videos() {
            list = list.push(
                row![
                    column![text(&video.title), text(&video.duration).size(12)]
                        .spacing(4)
                        .width(Length::Fill),
                    // No preview or download endpoint exists yet.
                    button("Preview"),
                    button("Download"),
                ]
                .spacing(8),
            );
        }

        card_container(list.into())
    }

    fn view_notifications(&self) -> Element<'_, Message> {
        let mut toasts = Column::new().spacing(4).padding([8, 24]);
        for notification in self.dashboard.notifications.visible() {
            let style: fn(&iced::Theme) -> text::Style = match notification.severity() {
                Severity::Success => text::success,
                Severity::Error => text::danger,
            };
            let message = text(notification.message()).style(style);
            toasts = toasts.push(
                row![
                    message.width(Length::Fill),
                    button("Dismiss").on_press(Message::DismissNotification(notification.id())),
                ]
                .spacing(8),
            );
        }
        toasts.into()
    }
}

fn view_processing(processing: &VideoProcessing) -> Element<'_, Message> {
    let badge = processing
        .status()
        .map(ToString::to_string)
        .unwrap_or_else(|| "Processing".to_string());

    let mut card = Column::new().spacing(16).push(
        row![
            text("Processing Status").size(20).width(Length::Fill),
            text(badge),
        ]
        .spacing(8),
    );

    match processing.latest() {
        None => card = card.push(text("Loading...")),
        Some(status) => {
            card = card.push(progress_bar(
                0.0..=100.0,
                clamp_progress(status.progress) as f32,
            ));
            for step in &status.steps {
                card = card.push(
                    row![
                        text(&step.name).width(Length::Fill),
                        text(&step.status),
                    ]
                    .spacing(8),
                );
            }
        }
    }

    card_container(card.into())
}

fn card_container(content: Element<'_, Message>) -> Element<'_, Message> {
    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

async fn pick_file() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Select a document")
        .add_filter("Documents", ACCEPTED_EXTENSIONS)
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

async fn send_file(service: HttpJobService, file: SelectedFile) -> Result<UploadResult, String> {
    let upload = file.read().await.map_err(|e| e.to_string())?;
    service.upload(upload).await.map_err(|e| e.to_string())
}

async fn fetch_status(
    service: HttpJobService,
    task_id: String,
) -> (String, Result<ProcessingStatus, String>) {
    let result = service.status(&task_id).await.map_err(|e| e.to_string());
    (task_id, result)
}
