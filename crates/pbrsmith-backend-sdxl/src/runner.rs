//! SDXL subprocess runner.
//!
//! Spawns the Python entrypoint per request and communicates through JSON
//! files: the request JSON goes in, the entrypoint writes a report JSON and
//! the output PNG next to it.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use pbrsmith_core::{InferenceRequest, TextureBuffer};
use serde::{Deserialize, Serialize};

use crate::error::{SdxlError, SdxlResult};

const EMBEDDED_ENTRYPOINT_PY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/python/sdxl_entrypoint.py"
));

/// Default timeout for one generation (10 minutes; the first call also
/// pays for model download and load).
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Configuration for the SDXL runner.
#[derive(Debug, Clone)]
pub struct SdxlConfig {
    /// Path to the Python interpreter.
    pub python_path: Option<PathBuf>,
    /// Path to the entrypoint script.
    pub entrypoint_path: PathBuf,
    /// Timeout for one subprocess run.
    pub timeout: Duration,
    /// Accept the slow CPU execution path when no CUDA device exists.
    pub allow_cpu: bool,
    /// Whether to capture the subprocess's stderr.
    pub capture_output: bool,
}

impl Default for SdxlConfig {
    fn default() -> Self {
        Self {
            python_path: None,
            entrypoint_path: PathBuf::from("python/sdxl_entrypoint.py"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            allow_cpu: false,
            capture_output: true,
        }
    }
}

impl SdxlConfig {
    /// Sets the interpreter path.
    pub fn python_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.python_path = Some(path.into());
        self
    }

    /// Sets the entrypoint script path.
    pub fn entrypoint_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.entrypoint_path = path.into();
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Accept CPU execution when CUDA is unavailable.
    pub fn allow_cpu(mut self, allow: bool) -> Self {
        self.allow_cpu = allow;
        self
    }
}

/// What the availability probe learned about the environment.
#[derive(Debug, Clone, Copy)]
pub struct SdxlProbe {
    /// Whether a CUDA device is available to the entrypoint.
    pub cuda: bool,
}

/// Request file handed to the entrypoint.
#[derive(Serialize)]
struct RequestFile<'a> {
    prompt: &'a str,
    negative_prompt: Option<&'a str>,
    steps: u32,
    guidance_scale: f64,
    width: u32,
    height: u32,
    seed: Option<u32>,
    output: String,
}

/// Report file written back by the entrypoint.
#[derive(Deserialize)]
struct ReportFile {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    cuda: Option<bool>,
}

struct ResolvedEntrypoint {
    path: PathBuf,
    _tempfile: Option<tempfile::NamedTempFile>,
}

/// Drives the SDXL entrypoint subprocess.
pub(crate) struct SdxlRunner {
    config: SdxlConfig,
}

impl SdxlRunner {
    pub(crate) fn new(config: SdxlConfig) -> Self {
        Self { config }
    }

    pub(crate) fn config(&self) -> &SdxlConfig {
        &self.config
    }

    /// Finds the Python interpreter.
    fn find_python(&self) -> SdxlResult<PathBuf> {
        // Check config override first
        if let Some(ref path) = self.config.python_path {
            if path.exists() {
                return Ok(path.clone());
            }
        }

        // Check PBRSMITH_PYTHON environment variable
        if let Ok(path) = std::env::var("PBRSMITH_PYTHON") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        for name in ["python3", "python"] {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }

        Err(SdxlError::PythonNotFound)
    }

    fn resolve_entrypoint(&self) -> SdxlResult<ResolvedEntrypoint> {
        // Config override first.
        if self.config.entrypoint_path.exists() {
            return Ok(ResolvedEntrypoint {
                path: self.config.entrypoint_path.clone(),
                _tempfile: None,
            });
        }

        // Environment override (fallback).
        if let Ok(path) = std::env::var("PBRSMITH_SDXL_ENTRYPOINT") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(ResolvedEntrypoint {
                    path,
                    _tempfile: None,
                });
            }
            return Err(SdxlError::EntrypointNotFound { path });
        }

        // Last resort: write the embedded entrypoint to a temp file.
        let mut file = tempfile::Builder::new()
            .prefix("pbrsmith_sdxl_entrypoint_")
            .suffix(".py")
            .tempfile()
            .map_err(SdxlError::Io)?;
        file.write_all(EMBEDDED_ENTRYPOINT_PY.as_bytes())
            .map_err(SdxlError::Io)?;
        file.flush().map_err(SdxlError::Io)?;

        Ok(ResolvedEntrypoint {
            path: file.path().to_path_buf(),
            _tempfile: Some(file),
        })
    }

    /// Probe the environment without generating anything.
    ///
    /// Runs the entrypoint in check mode, which imports the inference
    /// stack and reports CUDA availability.
    pub(crate) fn check(&self) -> SdxlResult<SdxlProbe> {
        let temp_dir = tempfile::tempdir().map_err(SdxlError::Io)?;
        let report_path = temp_dir.path().join("report.json");

        let report = self.invoke(&["--check"], &report_path)?;
        if !report.ok {
            return Err(SdxlError::generation_failed(
                report.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(SdxlProbe {
            cuda: report.cuda.unwrap_or(false),
        })
    }

    /// Run one inference and decode the produced image.
    pub(crate) fn run(&self, request: &InferenceRequest) -> SdxlResult<TextureBuffer> {
        let temp_dir = tempfile::tempdir().map_err(SdxlError::Io)?;
        let request_path = temp_dir.path().join("request.json");
        let report_path = temp_dir.path().join("report.json");
        let output_path = temp_dir.path().join("output.png");

        let request_file = RequestFile {
            prompt: &request.prompt,
            negative_prompt: request.negative_prompt.as_deref(),
            steps: request.steps,
            guidance_scale: request.guidance_scale,
            width: request.width,
            height: request.height,
            seed: request.seed,
            output: output_path.to_string_lossy().to_string(),
        };
        let request_json =
            serde_json::to_string(&request_file).map_err(SdxlError::SerializeRequestFailed)?;
        std::fs::write(&request_path, request_json).map_err(SdxlError::WriteRequestFailed)?;

        let request_arg = request_path.to_string_lossy().to_string();
        let report = self.invoke(&["--request", request_arg.as_str()], &report_path)?;
        if !report.ok {
            return Err(SdxlError::generation_failed(
                report.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        if !output_path.exists() {
            return Err(SdxlError::OutputNotFound { path: output_path });
        }

        decode_image(&output_path, request.width, request.height)
    }

    /// Spawn the entrypoint with the given mode arguments and parse its
    /// report.
    fn invoke(&self, mode_args: &[&str], report_path: &Path) -> SdxlResult<ReportFile> {
        let python = self.find_python()?;
        let entrypoint = self.resolve_entrypoint()?;

        let mut cmd = Command::new(&python);
        cmd.arg(&entrypoint.path)
            .args(mode_args)
            .arg("--report")
            .arg(report_path);
        if self.config.allow_cpu {
            cmd.arg("--allow-cpu");
        }

        if self.config.capture_output {
            // Keep stdout unpiped so a chatty entrypoint cannot deadlock on
            // a filled pipe; only stderr is surfaced in errors.
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        let child = cmd.spawn().map_err(SdxlError::SpawnFailed)?;
        let (status, stderr) =
            wait_with_timeout(child, self.config.timeout, self.config.capture_output)?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            return Err(SdxlError::process_failed(exit_code, stderr));
        }

        let report_content =
            std::fs::read_to_string(report_path).map_err(|e| SdxlError::ReadReportFailed {
                path: report_path.to_path_buf(),
                source: e,
            })?;

        serde_json::from_str(&report_content).map_err(SdxlError::ParseReportFailed)
    }
}

/// Decode the entrypoint's PNG output into a texture buffer.
fn decode_image(path: &Path, expected_width: u32, expected_height: u32) -> SdxlResult<TextureBuffer> {
    let file = std::fs::File::open(path)?;
    let decoder = png::Decoder::new(file);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(SdxlError::InvalidImage(format!(
            "expected 8-bit depth, got {:?}",
            info.bit_depth
        )));
    }
    if (info.width, info.height) != (expected_width, expected_height) {
        return Err(SdxlError::InvalidImage(format!(
            "expected {}x{}, got {}x{}",
            expected_width, expected_height, info.width, info.height
        )));
    }

    let bytes = &buf[..info.buffer_size()];
    let rgb: Vec<u8> = match info.color_type {
        png::ColorType::Rgb => bytes.to_vec(),
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        other => {
            return Err(SdxlError::InvalidImage(format!(
                "unsupported color type {:?}",
                other
            )))
        }
    };

    TextureBuffer::from_rgb8(&rgb, info.width, info.height)
        .ok_or_else(|| SdxlError::InvalidImage("pixel data length mismatch".to_string()))
}

fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    capture_output: bool,
) -> SdxlResult<(ExitStatus, String)> {
    let start = Instant::now();

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SdxlError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(SdxlError::SpawnFailed(e)),
        }
    };

    let stderr = if capture_output {
        let mut buf = String::new();
        if let Some(mut err) = child.stderr.take() {
            let _ = err.read_to_string(&mut buf);
        }
        buf
    } else {
        String::new()
    };

    Ok((status, stderr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbrsmith_core::{Color, PngConfig};

    #[test]
    fn test_config_builder() {
        let config = SdxlConfig::default()
            .python_path("/usr/bin/python3")
            .entrypoint_path("custom/entry.py")
            .timeout_secs(120)
            .allow_cpu(true);

        assert_eq!(config.python_path, Some(PathBuf::from("/usr/bin/python3")));
        assert_eq!(config.entrypoint_path, PathBuf::from("custom/entry.py"));
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.allow_cpu);
    }

    #[test]
    fn test_wait_with_timeout_captures_stderr() {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "echo hello 1>&2"]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", "echo hello 1>&2"]);
            cmd
        };

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        let child = cmd.spawn().unwrap();

        let (status, stderr) = wait_with_timeout(child, Duration::from_secs(2), true).unwrap();
        assert!(status.success());
        assert!(stderr.to_lowercase().contains("hello"));
    }

    #[test]
    fn test_wait_with_timeout_kills_slow_child() {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "ping -n 10 127.0.0.1 > NUL"]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", "sleep 10"]);
            cmd
        };

        let child = cmd.spawn().unwrap();
        let err = wait_with_timeout(child, Duration::from_millis(200), false).unwrap_err();
        assert!(matches!(err, SdxlError::Timeout { .. }));
    }

    #[test]
    fn test_resolve_entrypoint_falls_back_to_embedded() {
        // If the user has configured an environment override, don't stomp it.
        if std::env::var_os("PBRSMITH_SDXL_ENTRYPOINT").is_some() {
            eprintln!("PBRSMITH_SDXL_ENTRYPOINT is set; skipping embedded entrypoint test");
            return;
        }

        let config = SdxlConfig::default().entrypoint_path("this/does/not/exist.py");
        let runner = SdxlRunner::new(config);

        let entrypoint = runner.resolve_entrypoint().unwrap();
        assert!(entrypoint.path.exists());

        let content = std::fs::read_to_string(&entrypoint.path).unwrap();
        assert!(content.contains("pbrsmith SDXL entrypoint"));
    }

    #[test]
    fn test_report_parsing() {
        let report: ReportFile =
            serde_json::from_str(r#"{"ok": true, "cuda": false}"#).unwrap();
        assert!(report.ok);
        assert_eq!(report.cuda, Some(false));
        assert!(report.error.is_none());

        let report: ReportFile =
            serde_json::from_str(r#"{"ok": false, "error": "CUDA out of memory"}"#).unwrap();
        assert!(!report.ok);
        assert_eq!(report.error.as_deref(), Some("CUDA out of memory"));
    }

    #[test]
    fn test_decode_image_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");

        let mut buffer = TextureBuffer::new(4, 4, Color::black());
        buffer.set(1, 2, Color::rgb(1.0, 0.5, 0.25));
        pbrsmith_core::png::write_rgb(&buffer, &path, &PngConfig::default()).unwrap();

        let decoded = decode_image(&path, 4, 4).unwrap();
        assert_eq!(decoded.to_rgb8(), buffer.to_rgb8());
    }

    #[test]
    fn test_decode_image_rejects_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");

        let buffer = TextureBuffer::new(4, 4, Color::black());
        pbrsmith_core::png::write_rgb(&buffer, &path, &PngConfig::default()).unwrap();

        let err = decode_image(&path, 8, 8).unwrap_err();
        assert!(matches!(err, SdxlError::InvalidImage(_)));
    }
}
