//! CLI argument parsing.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};

/// Example shown below the usage text.
const EXAMPLE: &str = "Example:
  am-export UsernamePassword ~/repos/forgeops-init/forgecloud/default/am/realms/root";

/// Exports JSON configuration files for an authentication tree, its
/// individual nodes, and supporting scripts.
#[derive(Debug, Parser)]
#[command(name = "am-export")]
#[command(author, version)]
#[command(after_help = EXAMPLE)]
pub struct Cli {
    /// Name of the authentication tree to export.
    pub tree_name: Option<String>,

    /// Directory the entity files are written to.
    pub output_dir: Option<PathBuf>,

    /// Service root URL (overrides config).
    #[arg(long, env = "AM_BASE_URL")]
    pub base_url: Option<String>,

    /// Administrator username (overrides config).
    #[arg(short, long, env = "AM_USERNAME")]
    pub username: Option<String>,

    /// Administrator password (overrides config; prompted for if unset).
    #[arg(long, env = "AM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Header carrying the session token (overrides config).
    #[arg(long)]
    pub session_header: Option<String>,

    /// Skip TLS certificate validation.
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Configuration file (default: ~/.am-export/config.toml).
    #[arg(short, long, env = "AM_EXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Tree name and output directory, when both were given.
    pub fn target(&self) -> Option<(&str, &Path)> {
        match (&self.tree_name, &self.output_dir) {
            (Some(tree), Some(dir)) => Some((tree.as_str(), dir.as_path())),
            _ => None,
        }
    }

    /// Usage text.
    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }
}
