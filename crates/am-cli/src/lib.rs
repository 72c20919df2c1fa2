//! # am-cli
//!
//! Command-line exporter for authentication trees.
//!
//! `am-export <tree_name> <output_directory>` writes the tree, its nodes
//! and their scripts as JSON files below the output directory. Without
//! both arguments it prints usage and does nothing else.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod output;

use am_tree::ExportSummary;

pub use cli::Cli;
pub use config::ExportConfig;
pub use error::{CliError, CliResult};

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// Arguments were missing; usage was printed.
    Usage,
    /// The tree was exported.
    Exported(ExportSummary),
}

/// Runs the exporter for parsed arguments.
///
/// Configuration is only read, and the network only touched, once both
/// positional arguments are present.
pub async fn run(cli: Cli) -> CliResult<Outcome> {
    let Some((tree_name, output_dir)) = cli.target() else {
        println!("{}", Cli::usage());
        return Ok(Outcome::Usage);
    };

    let config = ExportConfig::load(cli.config.as_deref())?.with_overrides(&cli);
    let summary = export::run_export(tree_name, output_dir, &config).await?;
    Ok(Outcome::Exported(summary))
}
