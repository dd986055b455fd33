use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Report artifact the engine is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Html,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::Csv => "csv",
        }
    }

    /// File suffix the engine appends to the output path, e.g. `.report.json`
    pub fn report_extension(&self) -> String {
        format!(".report.{}", self.as_str())
    }
}

/// One engine invocation for one site
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub url: String,
    pub output_path: PathBuf,
    pub formats: Vec<OutputFormat>,
    pub params: Vec<String>,
}

impl AuditRequest {
    pub fn new(url: String, output_path: PathBuf) -> Self {
        Self {
            url,
            output_path,
            formats: vec![OutputFormat::Json],
            params: Vec::new(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        if !self.formats.contains(&format) {
            self.formats.push(format);
        }
        self
    }

    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = params;
        self
    }
}

/// What the engine reported back. A non-zero exit is the only failure signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    Completed,
    Failed { stderr: String },
}

impl EngineOutcome {
    pub fn failed(stderr: impl Into<String>) -> Self {
        EngineOutcome::Failed {
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EngineOutcome::Completed)
    }
}
