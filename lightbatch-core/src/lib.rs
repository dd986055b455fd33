pub mod batch;
pub mod budget;
pub mod error;
pub mod metrics;
pub mod naming;
pub mod output;
pub mod report;
pub mod summary;

pub use batch::{BatchOptions, BatchOutcome, BatchProgressCallback, BatchRunner};
pub use budget::{Budgets, check_budgets};
pub use error::{CoreError, Result};
pub use metrics::{MetricSample, MetricsAccumulator, TrackedMetric};
pub use naming::{Site, SiteOutputs, build_sites, derive_name};
pub use report::{AuditReport, NormalizedScores, normalize};
pub use summary::{AuditSnapshot, BatchResult, Summary};

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
  _ _       _     _   _           _       _
 | (_) __ _| |__ | |_| |__   __ _| |_ ___| |__
 | | |/ _` | '_ \| __| '_ \ / _` | __/ __| '_ \
 | | | (_| | | | | |_| |_) | (_| | || (__| | | |
 |_|_|\__, |_| |_|\__|_.__/ \__,_|\__\___|_| |_|
      |___/
"#;
    eprintln!("{}", banner.bright_cyan());
    eprintln!(
        "  {} {}\n",
        "lightbatch".bright_white().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
