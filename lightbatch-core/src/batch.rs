use crate::budget::{Budgets, check_budgets};
use crate::error::Result;
use crate::metrics::{MetricSample, MetricsAccumulator};
use crate::naming::{Site, SiteOutputs, build_sites};
use crate::output;
use crate::report::{metric_snapshot, normalize, read_report};
use crate::summary::{BatchResult, Summary};
use lightbatch_runner::{AuditEngine, AuditRequest, EngineOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_OUT_DIR: &str = "report/lighthouse";

/// Options for configuring a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub out_dir: PathBuf,
    pub outputs: SiteOutputs,
    /// Keep each site's JSON report after it has been summarized
    pub keep_reports: bool,
    /// Stop auditing further sites after the first budget violation
    pub fail_fast: bool,
    /// Extra arguments passed through to the engine
    pub params: Vec<String>,
    pub budgets: Budgets,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            outputs: SiteOutputs::default(),
            keep_reports: true,
            fail_fast: false,
            params: Vec::new(),
            budgets: Budgets::default(),
        }
    }
}

/// Callback for reporting batch progress
pub type BatchProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Where a site is in its audit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteStage {
    Pending,
    Invoked,
    Normalized,
    BudgetChecked,
    Recorded,
}

/// Result of a finished batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub result: BatchResult,
    pub budget_errors: Vec<String>,
    pub summary_path: PathBuf,
    /// Sites never audited because of fail-fast
    pub skipped: usize,
}

impl BatchOutcome {
    pub fn passed(&self) -> bool {
        self.budget_errors.is_empty()
    }
}

/// Drives the engine over a list of sites, one at a time
pub struct BatchRunner<E> {
    engine: E,
    options: BatchOptions,
    progress: Option<BatchProgressCallback>,
}

impl<E: AuditEngine> BatchRunner<E> {
    pub fn new(engine: E, options: BatchOptions) -> Self {
        Self {
            engine,
            options,
            progress: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: BatchProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn report(&self, msg: String) {
        if let Some(ref callback) = self.progress {
            callback(msg);
        }
    }

    /// Audit every URL in order, write `summary.json` and return the outcome
    pub async fn run(&self, urls: &[String]) -> Result<BatchOutcome> {
        let out_dir = &self.options.out_dir;

        for path in output::clean_output_dir(out_dir)? {
            self.report(format!("Removing old report file: {}", path.display()));
        }

        let sites = build_sites(urls, self.options.outputs);
        let count = sites.len();
        self.report(format!(
            "Lighthouse batch run begin for {} site{}",
            count,
            if count == 1 { "" } else { "s" }
        ));

        let mut metrics = MetricsAccumulator::new();
        let mut budget_errors: Vec<String> = Vec::new();
        let mut reports = Vec::with_capacity(count);

        for (idx, site) in sites.iter().enumerate() {
            if self.options.fail_fast && !budget_errors.is_empty() {
                info!(
                    "Fail-fast: skipping {} remaining site(s)",
                    count - reports.len()
                );
                break;
            }

            let prefix = format!("{}/{}: ", idx + 1, count);
            let mut summary = self.audit_site(site, &prefix).await;

            let errors = check_budgets(&summary, &self.options.budgets);
            debug!(site = %site.name, stage = ?SiteStage::BudgetChecked, violations = errors.len());
            if !errors.is_empty() {
                for error in &errors {
                    debug!("Budget violation: {}", error);
                }
                budget_errors.extend(errors.iter().cloned());
                summary.attach_budget_errors(errors);
            }

            if !summary.is_failed()
                && let Some(ref audits) = summary.audits
            {
                metrics.record(&MetricSample::from_audits(audits));
            }
            debug!(site = %site.name, stage = ?SiteStage::Recorded);

            reports.push(summary);
        }

        let skipped = count - reports.len();
        let averages = metrics.compute_averages(reports.len());
        let result = BatchResult { reports, averages };

        self.report("Lighthouse batch run end".to_string());
        let summary_path = output::write_summary(out_dir, &result)?;
        self.report(format!(
            "Wrote reports summary to {}",
            summary_path.display()
        ));

        Ok(BatchOutcome {
            result,
            budget_errors,
            summary_path,
            skipped,
        })
    }

    async fn audit_site(&self, site: &Site, prefix: &str) -> Summary {
        let out_dir = &self.options.out_dir;
        debug!(site = %site.name, stage = ?SiteStage::Pending);

        let request = site.formats().into_iter().fold(
            AuditRequest::new(site.url.clone(), site.engine_output_path(out_dir))
                .with_params(self.options.params.clone()),
            |request, format| request.with_format(format),
        );

        self.report(format!("{}Lighthouse analyzing '{}'", prefix, site.url));
        let outcome = match self.engine.audit(&request).await {
            Ok(outcome) => outcome,
            Err(e) => EngineOutcome::failed(e.to_string()),
        };
        debug!(site = %site.name, stage = ?SiteStage::Invoked, success = outcome.is_success());

        let report_path = site.report_path(out_dir);
        let mut summary = match outcome {
            EngineOutcome::Completed => match self.summarize(site, &report_path) {
                Ok(summary) => summary,
                Err(e) => {
                    warn!("Could not summarize {}: {}", site.url, e);
                    Summary::failed(site, e.to_string())
                }
            },
            EngineOutcome::Failed { stderr } => Summary::failed(site, stderr),
        };

        if summary.is_failed() {
            self.report(format!(
                "{}Lighthouse analysis FAILED for {}",
                prefix, summary.url
            ));
        } else {
            self.report(format!(
                "{}Lighthouse analysis of '{}' complete with score {}",
                prefix, summary.url, summary.score
            ));
        }

        if !self.options.keep_reports {
            match output::remove_report(&report_path) {
                Ok(true) => {
                    self.report(format!(
                        "Removing generated report file '{}'",
                        report_path.display()
                    ));
                    summary.file = None;
                }
                Ok(false) => {}
                Err(e) => warn!("Failed to remove {}: {}", report_path.display(), e),
            }
        }

        summary
    }

    fn summarize(&self, site: &Site, report_path: &std::path::Path) -> Result<Summary> {
        let report = read_report(report_path)?;
        let scores = normalize(&report)?;
        debug!(site = %site.name, stage = ?SiteStage::Normalized, score = scores.score());
        Ok(Summary::from_scores(site, &scores, metric_snapshot(&report)))
    }
}
