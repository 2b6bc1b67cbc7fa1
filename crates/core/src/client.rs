use async_trait::async_trait;
use reqwest::{Response, Url, multipart};
use tracing::debug;

use crate::{
    config::Config,
    error::{DocreelError, Result},
    types::{ProcessingStatus, UploadResult},
};

/// Multipart field the upload endpoint reads the document from.
pub const UPLOAD_FIELD: &str = "file";

/// A document ready to be sent.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The two endpoints of the video generation service.
#[async_trait]
pub trait JobService: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<UploadResult>;
    async fn status(&self, task_id: &str) -> Result<ProcessingStatus>;
}

#[derive(Clone)]
pub struct HttpJobService {
    client: reqwest::Client,
    base: Url,
}

impl HttpJobService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base: config.api_url.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DocreelError::InvalidUrl {
                url: self.base.to_string(),
                reason: "cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl JobService for HttpJobService {
    async fn upload(&self, file: UploadFile) -> Result<UploadResult> {
        let url = self.endpoint(&["api", "upload"])?;
        debug!(%url, file_name = %file.file_name, size = file.bytes.len(), "uploading document");

        let form = multipart::Form::new().part(
            UPLOAD_FIELD,
            multipart::Part::bytes(file.bytes).file_name(file.file_name),
        );

        let response = self.client.post(url).multipart(form).send().await?;
        let response = ensure_success(response).await?;

        Ok(response.json::<UploadResult>().await?)
    }

    async fn status(&self, task_id: &str) -> Result<ProcessingStatus> {
        let url = self.endpoint(&["api", "status", task_id])?;
        debug!(%url, "fetching processing status");

        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;

        Ok(response.json::<ProcessingStatus>().await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(DocreelError::Status {
        status,
        detail: error_detail(&body),
    })
}

/// Pulls `detail` out of an error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}
