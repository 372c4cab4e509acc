//! Error types for the SDXL backend.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for SDXL backend operations.
pub type SdxlResult<T> = Result<T, SdxlError>;

/// Errors that can occur while driving the SDXL subprocess.
#[derive(Debug, Error)]
pub enum SdxlError {
    /// No Python interpreter found.
    #[error("Python interpreter not found. Ensure python3 is installed and in PATH, or set PBRSMITH_PYTHON")]
    PythonNotFound,

    /// Entrypoint script not found at a configured path.
    #[error("SDXL entrypoint script not found at: {path}")]
    EntrypointNotFound { path: PathBuf },

    /// Failed to spawn the interpreter process.
    #[error("failed to spawn SDXL process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Process ran past the configured timeout.
    #[error("SDXL process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Process exited with a non-zero status.
    #[error("SDXL process exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// Failed to serialize the request for the entrypoint.
    #[error("failed to serialize request: {0}")]
    SerializeRequestFailed(#[source] serde_json::Error),

    /// Failed to write the request file for the entrypoint.
    #[error("failed to write request file: {0}")]
    WriteRequestFailed(#[source] std::io::Error),

    /// Failed to read the report back from the entrypoint.
    #[error("failed to read SDXL report from {path}: {source}")]
    ReadReportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report JSON did not parse.
    #[error("failed to parse SDXL report: {0}")]
    ParseReportFailed(#[source] serde_json::Error),

    /// The entrypoint reported a generation failure.
    #[error("SDXL generation failed: {message}")]
    GenerationFailed { message: String },

    /// No CUDA device and CPU fallback was not accepted.
    #[error("no CUDA acceleration available (pass allow_cpu to accept the slow CPU path)")]
    AccelerationUnavailable,

    /// The promised output image never appeared.
    #[error("expected output image not found: {path}")]
    OutputNotFound { path: PathBuf },

    /// Output image failed to decode.
    #[error("failed to decode output image: {0}")]
    DecodeFailed(#[from] png::DecodingError),

    /// Output image had the wrong shape or format.
    #[error("invalid output image: {0}")]
    InvalidImage(String),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdxlError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new generation failed error.
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            message: message.into(),
        }
    }
}

impl From<SdxlError> for pbrsmith_core::BackendError {
    fn from(err: SdxlError) -> Self {
        pbrsmith_core::BackendError::with_source(err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SdxlError::PythonNotFound;
        assert!(err.to_string().contains("Python interpreter not found"));

        let err = SdxlError::Timeout { timeout_secs: 600 };
        assert!(err.to_string().contains("600 seconds"));

        let err = SdxlError::process_failed(1, "CUDA out of memory");
        assert!(err.to_string().contains("CUDA out of memory"));
    }

    #[test]
    fn test_conversion_to_backend_error_keeps_message() {
        let err: pbrsmith_core::BackendError = SdxlError::AccelerationUnavailable.into();
        assert!(err.to_string().contains("CUDA"));
    }
}
