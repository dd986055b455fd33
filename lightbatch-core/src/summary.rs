use crate::naming::Site;
use crate::report::NormalizedScores;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display and raw value of one tracked audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSnapshot {
    pub display_value: String,
    pub numeric_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteErrors {
    pub budget: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<Box<SiteErrors>>,
}

/// Per-site entry of the batch summary document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
    /// Average category score as a percentage (0-100)
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audits: Option<BTreeMap<String, AuditSnapshot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<SiteErrors>,
}

impl Summary {
    pub fn from_scores(
        site: &Site,
        scores: &NormalizedScores,
        audits: BTreeMap<String, AuditSnapshot>,
    ) -> Self {
        Self {
            url: site.url.clone(),
            name: site.name.clone(),
            file: Some(site.output_file.clone()),
            html: site.html_file.clone(),
            csv: site.csv_file.clone(),
            score: scores.percent(),
            detail: Some(scores.detail.clone()),
            audits: Some(audits),
            error: None,
            errors: None,
        }
    }

    /// Entry for a site whose engine run did not produce a usable report
    pub fn failed(site: &Site, error: String) -> Self {
        Self {
            url: site.url.clone(),
            name: site.name.clone(),
            file: None,
            html: None,
            csv: None,
            score: 0.0,
            detail: None,
            audits: None,
            error: Some(error),
            errors: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Attach budget violations, keeping any earlier errors under `other`
    pub fn attach_budget_errors(&mut self, budget: Vec<String>) {
        if budget.is_empty() {
            return;
        }
        let other = self.errors.take().map(Box::new);
        self.errors = Some(SiteErrors { budget, other });
    }
}

/// The `summary.json` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub reports: Vec<Summary>,
    pub averages: BTreeMap<String, String>,
}
