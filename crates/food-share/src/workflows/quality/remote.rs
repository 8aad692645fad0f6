use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::domain::ImageAnalysisResult;
use super::heuristic::analyze_image;

/// Error raised while talking to the model service.
#[derive(Debug, thiserror::Error)]
pub enum RemoteClassifierError {
    #[error("model service client could not be built: {0}")]
    Client(reqwest::Error),
    #[error("model service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model service responded {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: String,
}

/// HTTP client for an external food-image model exposing `POST /analyze`.
#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RemoteClassifierError::Client)?;

        Ok(Self {
            client,
            endpoint: format!("{}/analyze", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the image as the multipart `image` field and decodes the model's verdict.
    pub async fn request(
        &self,
        image: &[u8],
        filename: &str,
    ) -> Result<ImageAnalysisResult, RemoteClassifierError> {
        let part = Part::bytes(image.to_vec())
            .file_name(filename.to_string())
            .mime_str(content_type_for(filename).as_ref())?;
        let form = Form::new().part("image", part);

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ServiceErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "failed to analyze image".to_string());
            return Err(RemoteClassifierError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ImageAnalysisResult>().await?)
    }

    /// Model verdict, or the local heuristic when the service cannot answer.
    pub async fn classify_or_fallback(&self, image: &[u8], filename: &str) -> ImageAnalysisResult {
        if image.is_empty() {
            return ImageAnalysisResult::unanalyzed();
        }

        match self.request(image, filename).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    error = %err,
                    "model service unavailable; using heuristic assessment"
                );
                analyze_image(image, filename)
            }
        }
    }
}

/// Best-effort content type from the file extension.
pub fn content_type_for(filename: &str) -> mime::Mime {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// True when a declared content type names an image.
pub fn is_image_content_type(value: &str) -> bool {
    value
        .parse::<mime::Mime>()
        .map(|parsed| parsed.type_() == mime::IMAGE)
        .unwrap_or(false)
}
