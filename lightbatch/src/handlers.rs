use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lightbatch_core::{
    BatchOptions, BatchOutcome, BatchProgressCallback, BatchRunner, Budgets, SiteOutputs,
};
use lightbatch_core::naming::has_scheme;
use lightbatch_runner::LighthouseEngine;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, warn};
use url::Url;

// Helper functions for the run handler

/// Collect sites from `--sites` and `--file`, command-line sites first
pub fn load_sites(sites: &[String], file: Option<&PathBuf>) -> Result<Vec<String>> {
    let mut urls: Vec<String> = sites
        .iter()
        .filter_map(|site| parse_site_line(site.trim()))
        .collect();

    if let Some(path) = file {
        urls.extend(load_urls_from_file(path)?);
    }

    if urls.is_empty() {
        bail!("No valid sites provided; use --sites or --file");
    }

    Ok(urls)
}

/// Load and parse sites from a newline-delimited file. Blank lines and `#` comments are skipped.
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sites file {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_site_line)
        .collect();

    if urls.is_empty() {
        bail!("No valid URLs found in {}", path.display());
    }

    Ok(urls)
}

/// Parse a single site, adding https:// to bare hosts
pub fn parse_site_line(line: &str) -> Option<String> {
    if line.is_empty() {
        return None;
    }

    let candidate = if has_scheme(line) {
        line.to_string()
    } else {
        format!("https://{}", line)
    };

    match Url::parse(&candidate) {
        Ok(url) if url.has_host() => Some(candidate),
        _ => {
            warn!("Skipping invalid URL '{}'", line);
            None
        }
    }
}

/// Split engine params on whitespace, keeping quoted sections together.
///
/// `--chrome-flags="--headless --no-sandbox"` stays one argument with the quotes removed.
pub fn split_params(params: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_arg = false;

    for c in params.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_arg = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if in_arg {
        args.push(current);
    }
    args
}

/// Value parser for budget thresholds
pub fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;

    if !(0.0..=100.0).contains(&threshold) {
        return Err(format!("{} is outside 0-100", threshold));
    }
    Ok(threshold)
}

pub fn budgets_from_args(args: &ArgMatches) -> Budgets {
    let get = |id: &str| args.get_one::<f64>(id).copied();
    Budgets {
        score: get("score"),
        accessibility: get("accessibility"),
        performance: get("performance"),
        best_practices: get("best-practices"),
        seo: get("seo"),
        pwa: get("pwa"),
    }
}

/// Read a JSON budget file and apply command-line overrides on top of it
pub fn load_budgets(file: Option<&PathBuf>, overrides: Budgets) -> Result<Budgets> {
    let base = match file {
        Some(path) => {
            let expanded = expand_path(&path.display().to_string());
            let content = fs::read_to_string(&expanded)
                .with_context(|| format!("Failed to read budget file {}", expanded.display()))?;
            serde_json::from_str::<Budgets>(&content)
                .with_context(|| format!("Invalid budget file {}", expanded.display()))?
        }
        None => Budgets::default(),
    };

    Ok(base.merge(overrides))
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// `--file` with `~` expanded
pub fn sites_file_from_args(args: &ArgMatches) -> Option<PathBuf> {
    args.get_one::<PathBuf>("file")
        .map(|path| expand_path(&path.display().to_string()))
}

pub fn batch_options_from_args(args: &ArgMatches) -> Result<BatchOptions> {
    let out = args
        .get_one::<String>("out")
        .map(String::as_str)
        .unwrap_or(lightbatch_core::batch::DEFAULT_OUT_DIR);

    let budgets = load_budgets(args.get_one::<PathBuf>("budget-file"), budgets_from_args(args))?;

    Ok(BatchOptions {
        out_dir: expand_path(out),
        outputs: SiteOutputs {
            html: args.get_flag("html"),
            csv: args.get_flag("csv"),
        },
        keep_reports: !args.get_flag("no-report"),
        fail_fast: args.get_flag("fail-fast"),
        params: args
            .get_one::<String>("params")
            .map(|p| split_params(p))
            .unwrap_or_default(),
        budgets,
    })
}

/// Configure the Lighthouse engine from `--engine` and `--chrome-flags`
pub fn engine_from_args(args: &ArgMatches) -> LighthouseEngine {
    let mut engine = LighthouseEngine::new();
    if let Some(executable) = args.get_one::<String>("engine") {
        engine = engine.with_executable(expand_path(executable));
    }
    if let Some(flags) = args.get_one::<String>("chrome-flags") {
        engine = engine.with_chrome_flags(flags.clone());
    }
    engine
}

pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn progress_reporter(verbose: bool, quiet: bool) -> (Option<ProgressBar>, Option<BatchProgressCallback>) {
    if verbose {
        let callback: BatchProgressCallback = Arc::new(|msg: String| {
            eprintln!("{} {}", "→".blue(), msg);
        });
        return (None, Some(callback));
    }
    if quiet {
        return (None, None);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Starting batch run...");

    let pb = spinner.clone();
    let callback: BatchProgressCallback = Arc::new(move |msg: String| {
        pb.set_message(msg);
    });
    (Some(spinner), Some(callback))
}

fn print_outcome(outcome: &BatchOutcome, quiet: bool) {
    let reports = &outcome.result.reports;
    let failed = reports.iter().filter(|r| r.is_failed()).count();

    if !quiet {
        println!(
            "{} {} site(s) audited, {} failed",
            "✓".green().bold(),
            reports.len(),
            failed
        );
        if outcome.skipped > 0 {
            println!(
                "{} {} site(s) skipped after budget failure",
                "→".yellow().bold(),
                outcome.skipped
            );
        }
        println!(
            "{} Summary: {}",
            "✓".green().bold(),
            outcome.summary_path.display().to_string().bright_white()
        );
    }

    for report in reports.iter().filter(|r| r.is_failed()) {
        eprintln!(
            "{} Lighthouse analysis FAILED for {}",
            "⚠".yellow().bold(),
            report.url
        );
    }

    for error in &outcome.budget_errors {
        eprintln!("{} {}", "✗".red().bold(), error.red());
    }
}

/// Run the batch described by `args` and return the process exit code
pub async fn handle_run(args: &ArgMatches) -> i32 {
    let verbose = args.get_flag("verbose");
    let quiet = args.get_flag("quiet");
    init_tracing(verbose);

    let sites: Vec<String> = args
        .get_many::<String>("sites")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let file = sites_file_from_args(args);
    let urls = match load_sites(&sites, file.as_ref()) {
        Ok(urls) => urls,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            return 1;
        }
    };

    let options = match batch_options_from_args(args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            return 1;
        }
    };

    let engine = engine_from_args(args);
    debug!("Using audit engine {}", engine.executable().display());

    let (spinner, callback) = progress_reporter(verbose, quiet);
    let mut runner = BatchRunner::new(engine, options);
    if let Some(callback) = callback {
        runner = runner.with_progress_callback(callback);
    }

    let result = runner.run(&urls).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(outcome) => {
            print_outcome(&outcome, quiet);
            if outcome.passed() { 0 } else { 1 }
        }
        Err(e) => {
            eprintln!("{} Batch run failed: {}", "✗".red().bold(), e);
            1
        }
    }
}
