//! # am-tree
//!
//! Export of authentication trees from an access management service.
//!
//! A tree is fetched together with every node it references, recursively,
//! and every script attached to the tree or its nodes. Each entity is
//! written as `<output>/<entityType>/<entityId>.json`.
//!
//! ## Components
//!
//! - [`AmClient`] - session and entity reads against the REST API
//! - [`canonical_type`] - node type to entity type mapping
//! - [`TreeWalker`] - depth-first traversal of the entity graph
//! - [`EntityStore`] - deterministic on-disk layout

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod entity;
pub mod error;
pub mod node_type;
pub mod source;
pub mod store;
pub mod walker;

pub use client::{AmClient, ClientConfig, DEFAULT_SESSION_HEADER};
pub use entity::{Entity, EntityMetadata, NodeRef};
pub use error::{ExportError, ExportResult};
pub use node_type::canonical_type;
pub use source::EntitySource;
pub use store::EntityStore;
pub use walker::{export_tree, ExportSummary, TreeWalker};
