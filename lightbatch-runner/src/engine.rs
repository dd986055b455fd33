use crate::error::{Result, RunnerError};
use crate::outcome::{AuditRequest, EngineOutcome, OutputFormat};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

pub const DEFAULT_EXECUTABLE: &str = "lighthouse";
pub const DEFAULT_CHROME_FLAGS: &str = "--no-sandbox --headless --disable-gpu";

/// Anything that can audit a URL and leave a JSON report at the requested path.
#[allow(async_fn_in_trait)]
pub trait AuditEngine {
    async fn audit(&self, request: &AuditRequest) -> Result<EngineOutcome>;
}

/// Runs the Lighthouse CLI as a subprocess
pub struct LighthouseEngine {
    executable: PathBuf,
    chrome_flags: String,
}

impl Default for LighthouseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LighthouseEngine {
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            chrome_flags: DEFAULT_CHROME_FLAGS.to_string(),
        }
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_chrome_flags(mut self, flags: impl Into<String>) -> Self {
        self.chrome_flags = flags.into();
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Build the argument list for one request.
    ///
    /// Default chrome flags are only added when the custom params don't
    /// already carry a `--chrome-flags=` entry.
    pub fn build_args(&self, request: &AuditRequest) -> Result<Vec<String>> {
        if request.url.trim().is_empty() {
            return Err(RunnerError::InvalidRequest("empty URL".to_string()));
        }

        let mut args = vec![request.url.clone()];
        let mut formats = request.formats.clone();
        if !formats.contains(&OutputFormat::Json) {
            formats.insert(0, OutputFormat::Json);
        }
        for format in formats {
            args.push("--output".to_string());
            args.push(format.as_str().to_string());
        }
        args.push("--output-path".to_string());
        args.push(request.output_path.display().to_string());

        let has_chrome_flags = request
            .params
            .iter()
            .any(|p| p.starts_with("--chrome-flags="));
        if !has_chrome_flags && !self.chrome_flags.is_empty() {
            args.push(format!("--chrome-flags={}", self.chrome_flags));
        }
        args.extend(request.params.iter().cloned());

        Ok(args)
    }
}

impl AuditEngine for LighthouseEngine {
    async fn audit(&self, request: &AuditRequest) -> Result<EngineOutcome> {
        let args = self.build_args(request)?;
        info!("Auditing {} with {}", request.url, self.executable.display());
        debug!("{} {}", self.executable.display(), args.join(" "));

        let output = match Command::new(&self.executable).args(&args).output().await {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Same observable result as a shell reporting "command not found"
                warn!("Audit engine {} not found", self.executable.display());
                return Ok(EngineOutcome::failed(format!(
                    "{}: {}",
                    self.executable.display(),
                    e
                )));
            }
            Err(e) => {
                return Err(RunnerError::Spawn {
                    executable: self.executable.display().to_string(),
                    source: e,
                });
            }
        };

        if output.status.success() {
            debug!("Engine finished for {}", request.url);
            Ok(EngineOutcome::Completed)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            warn!(
                "Engine exited with {} for {}",
                output.status.code().unwrap_or(-1),
                request.url
            );
            Ok(EngineOutcome::Failed { stderr })
        }
    }
}
