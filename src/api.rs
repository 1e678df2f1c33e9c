// API client module: a small blocking HTTP client for the OCR endpoint,
// plus the wire types it sends and receives. The extractors talk to it
// through the `OcrBackend` trait so they can be exercised without a network.

use crate::config::Config;
use crate::error::ScanError;
use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Header carrying the credential on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// An image read from disk and ready to be sent as the `image` form field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// JSON body for URL mode.
#[derive(Serialize, Debug)]
pub struct UrlRequest<'a> {
    pub url: &'a str,
}

/// Response envelope. `error` is kept as a `serde_json::Value` because the
/// service does not promise it is a string.
#[derive(Deserialize, Debug, Default)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<Payload>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Payload {
    #[serde(default)]
    pub text: Option<String>,
}

impl Envelope {
    /// Turn the envelope into the extracted text or the remote error.
    pub fn into_text(self) -> Result<String, ScanError> {
        if self.status.as_deref() == Some("ok") {
            let data = self
                .data
                .ok_or_else(|| ScanError::InvalidResponse("missing `data` object".into()))?;
            return Ok(data.text.unwrap_or_default());
        }
        let message = match self.error {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => "OCR extraction failed".to_string(),
            Some(other) => other.to_string(),
        };
        Err(ScanError::Remote(message))
    }
}

/// Parse a raw response body into an [`Envelope`].
pub fn parse_envelope(body: &str) -> Result<Envelope, ScanError> {
    serde_json::from_str(body).map_err(|e| ScanError::InvalidResponse(e.to_string()))
}

/// The two calls the extractors need from the remote service.
pub trait OcrBackend {
    /// Whether a credential is available. Checked before anything else.
    fn has_credential(&self) -> bool;

    /// POST the image as multipart form data.
    fn upload_image(&self, upload: ImageUpload) -> Result<Envelope, ScanError>;

    /// POST `{"url": ...}` as JSON.
    fn submit_url(&self, url: &str) -> Result<Envelope, ScanError>;
}

/// reqwest-backed client holding the endpoint and the API key.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Build a client from resolved settings. The timeout applies to the
    /// whole request, connect through body.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// POST to the endpoint with the credential header attached.
    fn post(&self) -> RequestBuilder {
        let mut req = self.client.post(&self.api_url);
        if let Some(key) = &self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }
        req
    }

    /// Read the body and parse it whatever the HTTP status; the envelope
    /// carries the real outcome.
    fn read_envelope(res: Response) -> Result<Envelope, ScanError> {
        let status = res.status();
        let body = res.text()?;
        debug!(%status, bytes = body.len(), "received OCR response");
        parse_envelope(&body).map_err(|e| match e {
            ScanError::InvalidResponse(detail) if !status.is_success() => {
                ScanError::InvalidResponse(format!("HTTP {status}: {detail}"))
            }
            other => other,
        })
    }
}

impl OcrBackend for ApiClient {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn upload_image(&self, upload: ImageUpload) -> Result<Envelope, ScanError> {
        debug!(
            file = %upload.file_name,
            mime = upload.mime,
            bytes = upload.bytes.len(),
            url = %self.api_url,
            "uploading image"
        );
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(upload.mime)?;
        let form = multipart::Form::new().part("image", part);

        let res = self.post().multipart(form).send()?;
        Self::read_envelope(res)
    }

    fn submit_url(&self, url: &str) -> Result<Envelope, ScanError> {
        debug!(image_url = url, url = %self.api_url, "submitting image url");
        let res = self.post().json(&UrlRequest { url }).send()?;
        Self::read_envelope(res)
    }
}
