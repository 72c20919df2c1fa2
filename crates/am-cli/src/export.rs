//! Export command implementation.

use std::path::Path;

use am_tree::{AmClient, EntityStore, ExportSummary, TreeWalker};
use tracing::debug;

use crate::config::ExportConfig;
use crate::output::{info, prompt_password, success, summary, warning};
use crate::CliResult;

/// Authenticates, then exports `tree_name` and everything it references
/// into `output_dir`.
pub async fn run_export(
    tree_name: &str,
    output_dir: &Path,
    config: &ExportConfig,
) -> CliResult<ExportSummary> {
    debug!(?config, "export configuration");

    let password = match &config.password {
        Some(password) => password.clone(),
        None => prompt_password(&format!("Password for {}: ", config.username))?,
    };
    if config.accept_invalid_certs {
        warning("TLS certificate validation is disabled");
    }

    let mut client = AmClient::new(config.client_config(password)?)?;
    info(&format!("Connecting to {}", client.base_url()));
    client.authenticate().await?;

    let store = EntityStore::new(output_dir);
    let result = TreeWalker::new(&client, &store)
        .on_saved(|_, path| success(&format!("Saved {}", path.display())))
        .export(tree_name)
        .await?;

    summary(&result);
    Ok(result)
}
