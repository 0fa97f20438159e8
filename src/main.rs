// src/main.rs

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Command, Format};
use git_ownership::config::Config;
use git_ownership::history::ChronologicalCommits;
use git_ownership::progress::Milestones;
use git_ownership::{export, parser, report};
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let start_time = Instant::now();
    let bar = ProgressBar::new(100);
    let progress = Milestones::new(&bar);

    match args.command {
        Command::Report {
            log,
            order,
            config,
            ignore,
            no_default_ignores,
            top,
            format,
            output,
        } => {
            let mut config = Config::load(config.as_deref())?;
            config.apply_overrides(ignore, no_default_ignores, top);

            let commits = parser::parse_log_file(&log, &progress)
                .with_context(|| format!("Failed to build report from {}", log.display()))?;
            let history = ChronologicalCommits::from_log(commits, order.into());
            let (code_report, ownership) = git_ownership::code_report(&history, &config, &progress);
            bar.finish_and_clear();

            info!(
                "Analysis finished in {:.2?}. Found {} commits, {} files.",
                start_time.elapsed(),
                history.len(),
                ownership.files.len()
            );

            let rendered = match format {
                Format::Text => report::render_text(&code_report, &ownership.counters),
                Format::Json => report::render_json(&code_report)?,
            };
            emit(output.as_deref(), &rendered)?;
        }
        Command::Commits { log, output } => {
            let commits = parser::parse_log_file(&log, &progress)
                .with_context(|| format!("Failed to parse {}", log.display()))?;
            bar.finish_and_clear();
            let commits: Vec<_> = commits.into_values().collect();
            emit(output.as_deref(), &serde_json::to_string_pretty(&commits)?)?;
        }
        Command::Export {
            repo,
            branch,
            output,
        } => {
            let written = export::export_log(&repo, branch.as_deref(), &output, &progress)
                .with_context(|| format!("Failed to export history of {}", repo.display()))?;
            bar.finish_and_clear();
            info!("Wrote {} commits to {}", written, output.display());
        }
    }

    info!("Total time: {:.2?}", start_time.elapsed());
    Ok(())
}

fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", content.trim_end());
            Ok(())
        }
    }
}
