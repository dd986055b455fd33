// Output directory housekeeping and summary persistence

use crate::error::Result;
use crate::summary::BatchResult;
use lightbatch_runner::OutputFormat;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SUMMARY_FILE: &str = "summary.json";

/// True for files a previous run could have left behind
pub fn is_stale_artifact(file_name: &str) -> bool {
    file_name == SUMMARY_FILE
        || [OutputFormat::Json, OutputFormat::Html, OutputFormat::Csv]
            .iter()
            .any(|f| file_name.ends_with(&f.report_extension()))
}

/// Remove report artifacts from an earlier run and make sure the directory exists.
/// Returns the removed paths.
pub fn clean_output_dir(out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    match fs::read_dir(out_dir) {
        Ok(entries) => {
            for entry in entries {
                let entry = entry?;
                let path = entry.path();
                let stale = path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(is_stale_artifact);
                if stale {
                    fs::remove_file(&path)?;
                    removed.push(path);
                }
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    fs::create_dir_all(out_dir)?;
    removed.sort();
    Ok(removed)
}

/// Remove a report file if it exists
pub fn remove_report(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed report file {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub fn summary_path(out_dir: &Path) -> PathBuf {
    out_dir.join(SUMMARY_FILE)
}

/// Write `summary.json` and return its path
pub fn write_summary(out_dir: &Path, result: &BatchResult) -> Result<PathBuf> {
    let path = summary_path(out_dir);
    let json = serde_json::to_string_pretty(result)?;
    fs::write(&path, json)?;
    Ok(path)
}

pub fn read_summary(path: &Path) -> Result<BatchResult> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
