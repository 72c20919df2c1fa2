//! Entity source trait.

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::ExportResult;

/// Source of exportable entities.
///
/// [`crate::AmClient`] reads them from the remote service; tests use
/// in-memory implementations.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Fetches an authentication tree by name.
    ///
    /// ## Errors
    ///
    /// Returns `ExportError::Transport` if the service rejects the request
    /// and `ExportError::Session` if no session is established.
    async fn fetch_tree(&self, name: &str) -> ExportResult<Entity>;

    /// Fetches a node by raw node type and id.
    ///
    /// ## Errors
    ///
    /// Same as [`EntitySource::fetch_tree`].
    async fn fetch_node(&self, node_type: &str, id: &str) -> ExportResult<Entity>;

    /// Fetches a script by id.
    ///
    /// ## Errors
    ///
    /// Same as [`EntitySource::fetch_tree`].
    async fn fetch_script(&self, id: &str) -> ExportResult<Entity>;
}
