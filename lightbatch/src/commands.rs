use crate::handlers::parse_threshold;
use clap::{ArgAction, ArgGroup, arg};
use lightbatch_core::batch::DEFAULT_OUT_DIR;
use lightbatch_runner::engine::DEFAULT_EXECUTABLE;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn budget_arg(id: &'static str, help: &'static str) -> clap::Arg {
    clap::Arg::new(id)
        .long(id)
        .value_name("SCORE")
        .required(false)
        .help(help)
        .value_parser(parse_threshold)
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("lightbatch")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("lightbatch")
        .about("Run Lighthouse against a batch of sites and enforce score budgets")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Print every step of the batch run")
                .required(false)
                .conflicts_with("quiet"),
        )
        .arg(
            arg!(-s --"sites" <URL>)
                .required(false)
                .help("Sites to audit. Bare hosts are audited over https://")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            arg!(-f --"file" <PATH>)
                .required(false)
                .help("Path to a newline-delimited file of sites to audit")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .group(
            ArgGroup::new("input")
                .args(["sites", "file"])
                .multiple(true)
                .required(true),
        )
        .arg(
            arg!(-o --"out" <DIR>)
                .required(false)
                .help("Directory for report files and summary.json")
                .default_value(DEFAULT_OUT_DIR),
        )
        .arg(
            arg!(-p --"params" <PARAMS>)
                .required(false)
                .help("Extra arguments passed through to the audit engine")
                .allow_hyphen_values(true),
        )
        .arg(
            arg!(-e --"engine" <PATH>)
                .required(false)
                .help("Audit engine executable")
                .default_value(DEFAULT_EXECUTABLE),
        )
        .arg(
            arg!(--"chrome-flags" <FLAGS>)
                .required(false)
                .help("Chrome flags for the engine, replacing the headless defaults")
                .allow_hyphen_values(true),
        )
        .arg(arg!(--"html" "Also generate an HTML report per site").required(false))
        .arg(arg!(--"csv" "Also generate a CSV report per site").required(false))
        .arg(
            arg!(--"no-report" "Remove each site's JSON report once it has been summarized")
                .required(false),
        )
        .arg(
            arg!(--"fail-fast" "Stop auditing further sites after the first budget violation")
                .required(false),
        )
        .arg(budget_arg("score", "Minimum average score (0-100) per site"))
        .arg(budget_arg("accessibility", "Minimum accessibility score (0-100)"))
        .arg(budget_arg("performance", "Minimum performance score (0-100)"))
        .arg(budget_arg("best-practices", "Minimum best practices score (0-100)"))
        .arg(budget_arg("seo", "Minimum SEO score (0-100)"))
        .arg(budget_arg("pwa", "Minimum PWA score (0-100)"))
        .arg(
            arg!(--"budget-file" <PATH>)
                .required(false)
                .help("JSON file of budgets; command-line budgets take precedence")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
