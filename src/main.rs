mod cli;
mod logging;
mod reporter;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use cli::{CheckArgs, Cli, Commands, ListArgs};
use colored::*;
use dotenv::dotenv;
use reporter::CliReporter;
use session_check::classify::{classify, GlobClassifier};
use session_check::normalize::NormalizedName;
use session_check::report::{write_report, IssueSummary};
use session_check::{scanner, AppConfig, SessionCheck, SilentReporter};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match session_check::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(2);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Check(check_args)) => {
            let found_issues = run_check(config, &check_args)?;
            if found_issues && check_args.fail_on_issues {
                process::exit(1);
            }
        }
        Some(Commands::List(list_args)) => run_list(&config, &list_args)?,
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

/// Returns whether any issue was reported.
fn run_check(mut config: AppConfig, args: &CheckArgs) -> anyhow::Result<bool> {
    config
        .exclude_patterns
        .extend(args.exclude_patterns.iter().cloned());

    let engine = SessionCheck::new(config);
    let result = engine
        .run(&args.root, &CliReporter::new())
        .with_context(|| format!("checking {}", args.root.display()))?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating report file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_report(&result.issues, args.format, &mut writer)?;
            writer.flush()?;
            info!("Report written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_report(&result.issues, args.format, &mut writer)?;
        }
    }

    let summary = IssueSummary::from_issues(&result.issues);
    info!(
        "{} files, {} subjects, {} issues",
        format!("{}", result.total_files).green(),
        format!("{}", result.subjects).cyan(),
        format!("{}", summary.total()).red(),
    );

    Ok(summary.total() > 0)
}

fn run_list(config: &AppConfig, args: &ListArgs) -> anyhow::Result<()> {
    let classifier = GlobClassifier::from_config(config)?;
    let files = scanner::list_dataset_files(&args.root, &config.ignore_patterns, &SilentReporter)
        .with_context(|| format!("listing {}", args.root.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut eligible = 0usize;
    for entry in &files {
        let Some(classified) = classify(entry, &classifier, config)? else {
            continue;
        };
        let name = NormalizedName::from_classified(&classified);
        writeln!(
            out,
            "{}\t{}\t{}",
            classified.subject.as_str().cyan(),
            classified
                .session
                .display_with(&config.default_session_label),
            name,
        )?;
        eligible += 1;
    }

    info!("{} of {} files take part in the check", eligible, files.len());
    Ok(())
}
