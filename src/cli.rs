// src/cli.rs

use clap::{Parser, Subcommand};
use git_ownership::history::LogOrder;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify every changed line of a patch log and rank the most changed files
    Report {
        /// Log produced by `git log -p --reverse -U0`
        #[arg(short, long)]
        log: PathBuf,

        /// How the log's commit order relates to chronological order
        #[arg(long, value_enum, default_value_t = Order::AsLogged)]
        order: Order,

        /// TOML file with `ignored_files` and `top_files`
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Extra path substring to exclude (repeatable)
        #[arg(long = "ignore", value_name = "SUBSTR")]
        ignore: Vec<String>,

        /// Drop the built-in lockfile exclusions
        #[arg(long)]
        no_default_ignores: bool,

        /// Number of most changed files to list
        #[arg(long)]
        top: Option<usize>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the parsed commits as JSON
    Commits {
        #[arg(short, long)]
        log: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the patch log of a local repository
    Export {
        /// Path to the git repository
        #[arg(short, long)]
        repo: PathBuf,

        /// Branch or revision to walk, HEAD by default
        #[arg(short, long)]
        branch: Option<String>,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum Order {
    /// Oldest first, as written by `git log --reverse`
    AsLogged,
    /// Newest first, as written by plain `git log`
    Reversed,
    /// Sort by author date
    ByDate,
}

impl From<Order> for LogOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::AsLogged => LogOrder::AsLogged,
            Order::Reversed => LogOrder::Reversed,
            Order::ByDate => LogOrder::ByDate,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}
