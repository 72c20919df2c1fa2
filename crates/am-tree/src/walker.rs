//! Tree traversal.
//!
//! Starting from a tree, every node it lists is fetched and written, then
//! the nodes that node lists, and so on. A script attached to an entity is
//! written after all of that entity's nodes. The order is depth-first
//! pre-order: an entity is on disk before any of its children are fetched.
//!
//! The walk keeps only pending references on an explicit stack, never the
//! fetched entities, so deep trees neither grow the call stack nor hold
//! the whole graph in memory.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::entity::{Entity, NodeRef, AUTH_TREE_TYPE, SCRIPT_TYPE};
use crate::error::ExportResult;
use crate::node_type::canonical_type;
use crate::source::EntitySource;
use crate::store::EntityStore;

/// Callback invoked after each entity is written.
type SavedHook<'a> = Box<dyn FnMut(&Entity, &Path) + Send + 'a>;

/// What an export wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Written files, in write order.
    pub written: Vec<PathBuf>,
    /// Number of entities written per entity type.
    pub by_type: BTreeMap<String, usize>,
}

impl ExportSummary {
    /// Total number of entities written.
    pub fn total(&self) -> usize {
        self.written.len()
    }

    fn record(&mut self, entity: &Entity, path: PathBuf) {
        *self.by_type.entry(entity.entity_type().to_string()).or_default() += 1;
        self.written.push(path);
    }
}

/// Reference waiting on the work stack.
#[derive(Debug)]
enum Pending {
    Node(NodeRef),
    Script(String),
}

impl Pending {
    /// `(entityType, entityId)` the reference resolves to.
    fn key(&self) -> (String, String) {
        match self {
            Self::Node(node) => (canonical_type(&node.node_type), node.id.clone()),
            Self::Script(id) => (SCRIPT_TYPE.to_string(), id.clone()),
        }
    }
}

/// Walks an entity graph, writing every reachable entity to a store.
///
/// Each `(entityType, entityId)` is fetched at most once per walker, so a
/// node shared by two parents is written once and a cyclic graph still
/// terminates. The first error ends the walk.
pub struct TreeWalker<'a, S: EntitySource + ?Sized> {
    source: &'a S,
    store: &'a EntityStore,
    visited: HashSet<(String, String)>,
    summary: ExportSummary,
    on_saved: Option<SavedHook<'a>>,
}

impl<'a, S: EntitySource + ?Sized> TreeWalker<'a, S> {
    /// Creates a walker reading from `source` and writing to `store`.
    pub fn new(source: &'a S, store: &'a EntityStore) -> Self {
        Self {
            source,
            store,
            visited: HashSet::new(),
            summary: ExportSummary::default(),
            on_saved: None,
        }
    }

    /// Registers a callback run after each write.
    #[must_use]
    pub fn on_saved(mut self, hook: impl FnMut(&Entity, &Path) + Send + 'a) -> Self {
        self.on_saved = Some(Box::new(hook));
        self
    }

    /// Exports the named tree and everything it references.
    ///
    /// ## Errors
    ///
    /// Returns the first fetch or write error. Files written before it
    /// remain on disk.
    pub async fn export(mut self, tree_name: &str) -> ExportResult<ExportSummary> {
        info!(tree = tree_name, "exporting tree");
        let tree = self.source.fetch_tree(tree_name).await?;
        self.visited
            .insert((AUTH_TREE_TYPE.to_string(), tree.entity_id().to_string()));
        self.save(&tree)?;
        self.walk(tree).await?;
        Ok(self.summary)
    }

    /// Writes everything reachable from an already written `entity`.
    ///
    /// ## Errors
    ///
    /// Returns the first fetch or write error.
    pub async fn walk(&mut self, entity: Entity) -> ExportResult<()> {
        let mut stack = Vec::new();
        push_children(&mut stack, &entity)?;
        drop(entity);

        while let Some(pending) = stack.pop() {
            if !self.visited.insert(pending.key()) {
                debug!(?pending, "already exported, skipping");
                continue;
            }

            match pending {
                Pending::Node(node) => {
                    let entity = self.source.fetch_node(&node.node_type, &node.id).await?;
                    self.save(&entity)?;
                    push_children(&mut stack, &entity)?;
                }
                Pending::Script(id) => {
                    let script = self.source.fetch_script(&id).await?;
                    self.save(&script)?;
                }
            }
        }
        Ok(())
    }

    fn save(&mut self, entity: &Entity) -> ExportResult<()> {
        let path = self.store.store_entity(entity)?;
        info!(entity = %entity.label(), path = %path.display(), "saved");
        if let Some(hook) = self.on_saved.as_mut() {
            hook(entity, &path);
        }
        self.summary.record(entity, path);
        Ok(())
    }
}

/// Pushes `entity`'s references so they pop in order: its nodes first,
/// in listed order, then its script.
fn push_children(stack: &mut Vec<Pending>, entity: &Entity) -> ExportResult<()> {
    if let Some(script) = entity.script_ref() {
        stack.push(Pending::Script(script.to_string()));
    }
    let nodes = entity.child_nodes()?;
    stack.extend(nodes.into_iter().rev().map(Pending::Node));
    Ok(())
}

/// Exports `tree_name` from `source` into `store`.
///
/// ## Errors
///
/// See [`TreeWalker::export`].
pub async fn export_tree<S: EntitySource + ?Sized>(
    source: &S,
    store: &EntityStore,
    tree_name: &str,
) -> ExportResult<ExportSummary> {
    TreeWalker::new(source, store).export(tree_name).await
}
