use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::Config,
    error::ClientError,
    models::{DetectionOutcome, DetectionResponse, HealthStatus},
    upload::UploadRequest,
};

const GENERIC_FAILURE: &str = "Detection failed";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// HTTP client for the detection service.
#[derive(Debug, Clone)]
pub struct DetectionClient {
    http: Client,
    origin: Url,
}

impl DetectionClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            origin: config.origin()?,
        })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `{origin}{relative}`, the way the service's `image_url` paths are meant to be resolved.
    pub fn resolve(&self, relative: &str) -> Result<Url, ClientError> {
        let origin = self.origin.as_str().trim_end_matches('/');
        let relative = relative.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", origin, relative))?)
    }

    /// Submits one image. Every failure collapses into `DetectionOutcome::Failure`.
    pub async fn detect(&self, request: UploadRequest) -> DetectionOutcome {
        let file_name = request.file_name.clone();
        info!(
            file = %file_name,
            bytes = request.bytes.len(),
            threshold = %request.threshold_field(),
            "submitting image for detection"
        );
        match self.try_detect(request).await {
            Ok(response) => {
                info!(
                    file = %file_name,
                    detections = response.detections.len(),
                    processing_time = response.processing_time,
                    "detection finished"
                );
                DetectionOutcome::Success(response)
            }
            Err(err) => {
                warn!(file = %file_name, %err, "detection failed");
                DetectionOutcome::Failure(err.to_string())
            }
        }
    }

    pub async fn try_detect(&self, request: UploadRequest) -> Result<DetectionResponse, ClientError> {
        let threshold = request.threshold_field();
        let file = Part::bytes(request.bytes)
            .file_name(request.file_name)
            .mime_str(&request.mime_type)?;
        let form = Form::new()
            .part("file", file)
            .text("confidence_threshold", threshold);

        let response = self
            .http
            .post(self.resolve("/detect")?)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .and_then(|detail| detail.as_str().map(str::to_string))
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            return Err(ClientError::Server { status, message });
        }

        let body: DetectionResponse = response.json().await?;
        if !body.success {
            return Err(ClientError::Rejected);
        }
        Ok(body)
    }

    /// Downloads the annotated image referenced by a response.
    pub async fn fetch_image(&self, image_url: &str) -> Result<Vec<u8>, ClientError> {
        let url = self.resolve(image_url)?;
        debug!(%url, "fetching result image");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self
            .http
            .get(self.resolve("/health")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
