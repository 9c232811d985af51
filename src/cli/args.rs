//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Extract critical-marked rules from a stylesheet into separate output files
#[derive(Parser, Debug)]
#[command(name = "critical-css")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract critical rules, write output groups, print the cleaned stylesheet
    Extract {
        /// Input stylesheet
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Write the cleaned stylesheet here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Directory extracted files are written under (default: cwd)
        #[arg(long, value_hint = ValueHint::DirPath)]
        output_path: Option<PathBuf>,

        /// Default destination file name (default: critical.css)
        #[arg(long)]
        output_dest: Option<String>,

        /// Strip marked rules from the original stylesheet
        #[arg(long)]
        no_preserve: bool,

        /// Keep extracted output unminified
        #[arg(long)]
        no_minify: bool,

        /// Log extracted CSS instead of writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the parsed stylesheet as a node tree
    Tree {
        /// Input stylesheet
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
