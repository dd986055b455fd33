// Score budgets: minimum acceptable scores per site

use crate::report::round_to;
use crate::summary::Summary;
use serde::{Deserialize, Serialize};

/// Thresholds on the 0-100 scale. A threshold is active when it is above zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Budgets {
    pub score: Option<f64>,
    pub accessibility: Option<f64>,
    pub performance: Option<f64>,
    pub best_practices: Option<f64>,
    pub seo: Option<f64>,
    pub pwa: Option<f64>,
}

impl Budgets {
    /// Combine with `overrides`, which win wherever they are set
    pub fn merge(self, overrides: Budgets) -> Budgets {
        Budgets {
            score: overrides.score.or(self.score),
            accessibility: overrides.accessibility.or(self.accessibility),
            performance: overrides.performance.or(self.performance),
            best_practices: overrides.best_practices.or(self.best_practices),
            seo: overrides.seo.or(self.seo),
            pwa: overrides.pwa.or(self.pwa),
        }
    }

    pub fn is_active(&self) -> bool {
        active(self.score).is_some()
            || CATEGORY_RULES
                .iter()
                .any(|rule| active((rule.threshold)(self)).is_some())
    }
}

struct CategoryRule {
    label: &'static str,
    id: &'static str,
    site_prefix: bool,
    threshold: fn(&Budgets) -> Option<f64>,
}

const CATEGORY_RULES: [CategoryRule; 5] = [
    CategoryRule {
        label: "accessibility",
        id: "accessibility",
        site_prefix: false,
        threshold: |b: &Budgets| b.accessibility,
    },
    CategoryRule {
        label: "performance",
        id: "performance",
        site_prefix: false,
        threshold: |b: &Budgets| b.performance,
    },
    CategoryRule {
        label: "best practices",
        id: "best-practices",
        site_prefix: false,
        threshold: |b: &Budgets| b.best_practices,
    },
    CategoryRule {
        label: "seo",
        id: "seo",
        site_prefix: true,
        threshold: |b: &Budgets| b.seo,
    },
    CategoryRule {
        label: "pwa",
        id: "pwa",
        site_prefix: true,
        threshold: |b: &Budgets| b.pwa,
    },
];

fn active(threshold: Option<f64>) -> Option<f64> {
    threshold.filter(|t| *t > 0.0)
}

fn violation(label: &str, actual: f64, threshold: f64, site_prefix: bool, url: &str) -> String {
    let target = if site_prefix { "site " } else { "" };
    format!(
        "{} score {} < {} for {}{}",
        label, actual, threshold, target, url
    )
}

/// Check one site against the configured budgets, returning a message per failed threshold
pub fn check_budgets(summary: &Summary, budgets: &Budgets) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(threshold) = active(budgets.score)
        && summary.score < threshold
    {
        errors.push(violation("average", summary.score, threshold, false, &summary.url));
    }

    // Failed sites have no category detail
    let Some(ref detail) = summary.detail else {
        return errors;
    };

    for rule in &CATEGORY_RULES {
        let Some(threshold) = active((rule.threshold)(budgets)) else {
            continue;
        };
        let Some(raw) = detail.get(rule.id) else {
            continue;
        };

        let actual = round_to(raw * 100.0, 2);
        if actual < threshold {
            errors.push(violation(
                rule.label,
                actual,
                threshold,
                rule.site_prefix,
                &summary.url,
            ));
        }
    }

    errors
}
