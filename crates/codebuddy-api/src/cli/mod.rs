//! CLI command definitions for the `codebuddy` binary.
//!
//! Uses clap derive macros for argument parsing. `serve` runs the web tutor,
//! `ask` answers one question, `chat` is the interactive terminal tutor.

pub mod ask;
pub mod chat;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use codebuddy_infra::startup::StartupIssue;

/// Your friendly AI-powered tutor for mastering any coding concept.
#[derive(Parser)]
#[command(name = "codebuddy", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web tutor and JSON API.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,

        /// Also export spans through OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Ask a single question and print the answer.
    Ask {
        /// The coding topic or question.
        question: String,

        /// Write the answer to this PDF file.
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Write the answer to this HTML file.
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Start an interactive tutoring session in the terminal.
    Chat,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Spinner shown while the tutor is working.
pub(crate) fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Thinking and searching... 🖼️");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Print startup problems (missing keys) to stderr.
pub(crate) fn print_startup_issues(issues: &[StartupIssue]) {
    for issue in issues {
        if issue.is_error() {
            eprintln!("  {} {}", style("!").red().bold(), style(&issue.message).red());
        } else {
            eprintln!("  {} {}", style("i").cyan().bold(), style(&issue.message).dim());
        }
    }
}
