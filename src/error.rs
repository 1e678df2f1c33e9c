// Error types for a single extraction. Every variant is reported to the
// user as a banner; none of them stop the interactive loop.

use std::path::PathBuf;
use thiserror::Error;

/// Why an extraction failed. The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum ScanError {
    /// No usable API key was found in flags, env or the config file.
    #[error("API key not configured. Set APIVERVE_API_KEY or add \"api_key\" to the config file.")]
    NotConfigured,

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Unsupported format. Use: {allowed}")]
    UnsupportedFormat { allowed: String },

    #[error("File too large. Maximum size is 5MB.")]
    FileTooLarge { size: u64 },

    /// The file exists but could not be opened or read.
    #[error("Could not read '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection, TLS, timeout or any other transport fault.
    #[error("API request failed: {0}")]
    Request(String),

    /// The body was not the JSON envelope we expect.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The service answered with a non-"ok" status.
    #[error("{0}")]
    Remote(String),
}

impl From<reqwest::Error> for ScanError {
    fn from(e: reqwest::Error) -> Self {
        ScanError::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_mentions_path() {
        let e = ScanError::FileNotFound {
            path: PathBuf::from("missing/receipt.png"),
        };
        assert_eq!(e.to_string(), "File not found: missing/receipt.png");
    }

    #[test]
    fn remote_message_is_verbatim() {
        let e = ScanError::Remote("bad image".into());
        assert_eq!(e.to_string(), "bad image");
    }

    #[test]
    fn read_failure_names_path_and_cause() {
        let e = ScanError::ReadFailed {
            path: PathBuf::from("scans/locked.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        };
        let msg = e.to_string();
        assert!(msg.contains("scans/locked.png"), "got: {msg}");
        assert!(msg.contains("permission denied"), "got: {msg}");
    }
}
