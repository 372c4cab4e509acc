//! pbrsmith SDXL Backend
//!
//! Implements [`DiffusionBackend`] by driving a Stable Diffusion XL
//! entrypoint as a Python subprocess. The Rust side owns process
//! management, timeouts, and the request/report protocol; the entrypoint
//! owns the model.
//!
//! # Architecture
//!
//! Communication happens via JSON files:
//! - The request JSON is written to a temp directory and passed to the
//!   entrypoint.
//! - The entrypoint writes the output PNG and a report JSON with its
//!   status.
//!
//! `load` runs the entrypoint once in check mode, which imports the
//! inference stack and reports CUDA availability. Without a CUDA device
//! the backend refuses to come up unless the configuration explicitly
//! accepts the slow CPU path.
//!
//! # Interpreter discovery
//!
//! The interpreter is searched in order:
//!
//! 1. `SdxlConfig::python_path`
//! 2. `PBRSMITH_PYTHON` environment variable
//! 3. `python3` / `python` on PATH
//!
//! The entrypoint script resolves the same way (configured path, then
//! `PBRSMITH_SDXL_ENTRYPOINT`, then an embedded copy written to a temp
//! file).

mod error;
mod runner;

pub use error::{SdxlError, SdxlResult};
pub use runner::{SdxlConfig, SdxlProbe, DEFAULT_TIMEOUT_SECS};

use pbrsmith_core::{BackendError, DiffusionBackend, InferenceRequest, TextureBuffer};
use runner::SdxlRunner;

/// Diffusion backend backed by an SDXL subprocess.
pub struct SdxlBackend {
    runner: SdxlRunner,
}

impl SdxlBackend {
    /// Create a backend with default configuration.
    pub fn new() -> Self {
        Self::with_config(SdxlConfig::default())
    }

    /// Create a backend with the given configuration.
    pub fn with_config(config: SdxlConfig) -> Self {
        Self {
            runner: SdxlRunner::new(config),
        }
    }

    /// Probe the environment without generating anything.
    pub fn probe(&self) -> SdxlResult<SdxlProbe> {
        self.runner.check()
    }
}

impl Default for SdxlBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffusionBackend for SdxlBackend {
    fn load(&mut self) -> Result<(), BackendError> {
        let probe = self.runner.check()?;
        if !probe.cuda && !self.runner.config().allow_cpu {
            return Err(SdxlError::AccelerationUnavailable.into());
        }
        Ok(())
    }

    fn infer(&mut self, request: &InferenceRequest) -> Result<TextureBuffer, BackendError> {
        Ok(self.runner.run(request)?)
    }

    // reclaim() keeps the default no-op: each inference runs in its own
    // process and the entrypoint empties the CUDA cache before exiting.
}
