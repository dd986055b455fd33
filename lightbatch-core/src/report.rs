// Audit engine report parsing and score normalization

use crate::error::{CoreError, Result};
use crate::metrics::TrackedMetric;
use crate::summary::AuditSnapshot;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryScore {
    #[serde(default)]
    pub id: Option<String>,
    /// The engine writes `null` for categories it could not score
    #[serde(default)]
    pub score: Option<f64>,
}

/// The two category layouts engine versions have shipped
#[derive(Debug, Clone, PartialEq)]
pub enum ReportCategories {
    /// `categories: { "<id>": { id, score } }`
    Keyed(BTreeMap<String, CategoryScore>),
    /// `reportCategories: [ { id, score } ]`
    Listed(Vec<CategoryScore>),
}

impl ReportCategories {
    pub fn iter(&self) -> Box<dyn Iterator<Item = &CategoryScore> + '_> {
        match self {
            ReportCategories::Keyed(map) => Box::new(map.values()),
            ReportCategories::Listed(list) => Box::new(list.iter()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportCategories::Keyed(map) => map.len(),
            ReportCategories::Listed(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    #[serde(default)]
    pub display_value: Option<String>,
    #[serde(default)]
    pub numeric_value: Option<f64>,
}

/// Report as written by the engine, before the category layout is resolved
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuditReport {
    #[serde(default)]
    categories: Option<BTreeMap<String, CategoryScore>>,
    #[serde(default)]
    report_categories: Option<Vec<CategoryScore>>,
    #[serde(default)]
    audits: BTreeMap<String, AuditEntry>,
}

/// One engine report with its category layout already resolved
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawAuditReport")]
pub struct AuditReport {
    pub categories: ReportCategories,
    pub audits: BTreeMap<String, AuditEntry>,
}

impl TryFrom<RawAuditReport> for AuditReport {
    type Error = String;

    fn try_from(raw: RawAuditReport) -> std::result::Result<Self, Self::Error> {
        let categories = match (raw.categories, raw.report_categories) {
            (Some(map), _) => ReportCategories::Keyed(map),
            (None, Some(list)) => ReportCategories::Listed(list),
            (None, None) => {
                return Err("neither `categories` nor `reportCategories` present".to_string());
            }
        };

        Ok(AuditReport {
            categories,
            audits: raw.audits,
        })
    }
}

impl AuditReport {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::MalformedReport(e.to_string()))
    }
}

/// Per-category scores plus their mean
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedScores {
    pub detail: BTreeMap<String, f64>,
    total: f64,
    count: usize,
}

impl NormalizedScores {
    fn mean(&self) -> f64 {
        self.total / self.count as f64
    }

    /// Mean category score on the 0-1 scale, rounded to 2 decimals
    pub fn score(&self) -> f64 {
        round_to(self.mean(), 2)
    }

    /// Mean category score as a percentage, rounded to 2 decimals
    pub fn percent(&self) -> f64 {
        round_to(self.mean() * 100.0, 2)
    }
}

/// Extract per-category scores and the overall mean.
///
/// Categories without an `id` still count toward the mean but are left out
/// of `detail`.
pub fn normalize(report: &AuditReport) -> Result<NormalizedScores> {
    if report.categories.is_empty() {
        return Err(CoreError::MalformedReport(
            "report has no categories".to_string(),
        ));
    }

    let mut detail = BTreeMap::new();
    let mut total = 0.0;
    for category in report.categories.iter() {
        let score = category.score.unwrap_or(0.0);
        if let Some(ref id) = category.id {
            detail.insert(id.clone(), score);
        }
        total += score;
    }

    Ok(NormalizedScores {
        detail,
        total,
        count: report.categories.len(),
    })
}

/// Load an engine report from disk
pub fn read_report(path: &Path) -> Result<AuditReport> {
    let content = fs::read_to_string(path).map_err(|e| CoreError::ReportRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    AuditReport::from_json(&content).map_err(|e| match e {
        CoreError::MalformedReport(msg) => {
            CoreError::MalformedReport(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Snapshot the tracked timing audits. Audits without a numeric value are skipped.
pub fn metric_snapshot(report: &AuditReport) -> BTreeMap<String, AuditSnapshot> {
    TrackedMetric::ALL
        .iter()
        .filter_map(|metric| {
            let entry = report.audits.get(metric.id())?;
            let numeric_value = entry.numeric_value?;
            Some((
                metric.id().to_string(),
                AuditSnapshot {
                    display_value: entry.display_value.clone().unwrap_or_default(),
                    numeric_value,
                },
            ))
        })
        .collect()
}

pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
