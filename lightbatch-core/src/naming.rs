// File naming for per-site report artifacts

use lightbatch_runner::OutputFormat;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Longest sanitized name kept before it gets truncated and hash-suffixed
pub const MAX_NAME_LEN: usize = 100;
const HASH_LEN: usize = 7;
const REPLACED_CHARS: [char; 9] = ['/', '?', '#', ':', '*', '$', '@', '!', '.'];

/// A site queued for auditing. Names are unique within one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub url: String,
    pub name: String,
    pub output_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_file: Option<String>,
}

impl Site {
    /// Path handed to the engine's `--output-path`.
    ///
    /// With extra output formats the engine derives every artifact name from
    /// a bare stem, so only the name is passed.
    pub fn engine_output_path(&self, out_dir: &Path) -> PathBuf {
        if self.html_file.is_some() || self.csv_file.is_some() {
            out_dir.join(&self.name)
        } else {
            out_dir.join(&self.output_file)
        }
    }

    pub fn report_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(&self.output_file)
    }

    pub fn formats(&self) -> Vec<OutputFormat> {
        let mut formats = vec![OutputFormat::Json];
        if self.html_file.is_some() {
            formats.push(OutputFormat::Html);
        }
        if self.csv_file.is_some() {
            formats.push(OutputFormat::Csv);
        }
        formats
    }
}

/// Which artifacts besides the JSON report each site produces
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteOutputs {
    pub html: bool,
    pub csv: bool,
}

/// Length of a leading `scheme://`, if the URL starts with one.
///
/// `://` later in the URL (e.g. inside a query string) does not count.
fn scheme_prefix_len(url: &str) -> Option<usize> {
    let idx = url.find("://")?;
    (idx > 0 && url[..idx].chars().all(is_scheme_char)).then_some(idx + 3)
}

/// True when the URL starts with `scheme://`
pub fn has_scheme(url: &str) -> bool {
    scheme_prefix_len(url).is_some()
}

/// Strip the scheme and replace path/URL punctuation with `_`
pub fn sanitize_name(url: &str) -> String {
    let without_scheme = match scheme_prefix_len(url) {
        Some(len) => &url[len..],
        None => url,
    };

    without_scheme
        .chars()
        .map(|c| if REPLACED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'
}

fn shorten_name(name: String) -> String {
    if name.chars().count() <= MAX_NAME_LEN {
        return name;
    }

    let truncated: String = name.chars().take(MAX_NAME_LEN).collect();
    let hash = hex::encode(Sha1::digest(name.as_bytes()));
    format!("{}_{}", truncated.trim_end_matches('_'), &hash[..HASH_LEN])
}

/// Derive a filesystem-safe, run-unique name for a URL and record it in `seen`
pub fn derive_name(url: &str, seen: &mut HashSet<String>) -> String {
    let base = shorten_name(sanitize_name(url));

    let mut candidate = base.clone();
    let mut suffix = 1;
    while seen.contains(&candidate) {
        candidate = format!("{}_{}", base, suffix);
        suffix += 1;
    }

    seen.insert(candidate.clone());
    candidate
}

/// Turn the input URLs into sites, in order
pub fn build_sites(urls: &[String], outputs: SiteOutputs) -> Vec<Site> {
    let mut seen = HashSet::new();

    urls.iter()
        .map(|url| {
            let name = derive_name(url, &mut seen);
            Site {
                url: url.clone(),
                output_file: format!("{}{}", name, OutputFormat::Json.report_extension()),
                html_file: outputs
                    .html
                    .then(|| format!("{}{}", name, OutputFormat::Html.report_extension())),
                csv_file: outputs
                    .csv
                    .then(|| format!("{}{}", name, OutputFormat::Csv.report_extension())),
                name,
            }
        })
        .collect()
}
