// Extractors: validate the request target locally, then hand it to the
// backend and unwrap the envelope. One attempt per call, no retries.

use crate::api::{ImageUpload, OcrBackend};
use crate::error::ScanError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Largest file accepted for upload: 5 MiB.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Allowed extensions, lowercase, without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// What the user asked us to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Url(String),
}

impl Target {
    /// `http://` and `https://` prefixes mean URL; anything else is a path.
    pub fn classify(input: &str) -> Target {
        if input.starts_with("http://") || input.starts_with("https://") {
            Target::Url(input.to_string())
        } else {
            Target::File(PathBuf::from(input))
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::File(p) => write!(f, "{}", p.display()),
            Target::Url(u) => f.write_str(u),
        }
    }
}

/// Successful extraction: where the image came from and what it said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub source: String,
    pub text: String,
}

pub type Outcome = Result<Extraction, ScanError>;

/// Ties the local validation rules to a backend.
pub struct Scanner<B> {
    backend: B,
}

impl<B: OcrBackend> Scanner<B> {
    pub fn new(backend: B) -> Self {
        Scanner { backend }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    pub fn extract(&self, target: &Target) -> Outcome {
        let outcome = match target {
            Target::File(path) => self.extract_file(path),
            Target::Url(url) => self.extract_url(url),
        };
        match &outcome {
            Ok(ex) => info!(
                source = %ex.source,
                chars = ex.text.chars().count(),
                "extraction succeeded"
            ),
            Err(e) => info!(source = %target, error = %e, "extraction failed"),
        }
        outcome
    }

    /// Validate and upload a local image.
    pub fn extract_file(&self, path: &Path) -> Outcome {
        if !self.backend.has_credential() {
            return Err(ScanError::NotConfigured);
        }
        let upload = load_image(path)?;
        let text = self.backend.upload_image(upload)?.into_text()?;
        Ok(Extraction {
            source: path.display().to_string(),
            text,
        })
    }

    /// Send an image URL; the service decides whether it is acceptable.
    pub fn extract_url(&self, url: &str) -> Outcome {
        if !self.backend.has_credential() {
            return Err(ScanError::NotConfigured);
        }
        let text = self.backend.submit_url(url)?.into_text()?;
        Ok(Extraction {
            source: url.to_string(),
            text,
        })
    }
}

/// Run the existence, extension and size checks, then read the file.
pub fn load_image(path: &Path) -> Result<ImageUpload, ScanError> {
    if !path.exists() {
        return Err(ScanError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mime = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(mime_for_extension)
        .ok_or_else(|| ScanError::UnsupportedFormat {
            allowed: allowed_extensions(),
        })?;

    let read_failed = |source| ScanError::ReadFailed {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(read_failed)?.len();
    if size > MAX_FILE_SIZE {
        return Err(ScanError::FileTooLarge { size });
    }

    let bytes = std::fs::read(path).map_err(read_failed)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    debug!(file = %file_name, size, mime, "image passed validation");

    Ok(ImageUpload {
        file_name,
        mime,
        bytes,
    })
}

/// MIME type for an allowed extension, case-insensitive.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// `.jpg, .jpeg, .png, .gif`
pub fn allowed_extensions() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(", ")
}
