//! Exported entity model.
//!
//! An [`Entity`] pairs the raw JSON returned by the service with the
//! metadata block that tells a later import step where the entity belongs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ExportError, ExportResult};

/// Version token left for a downstream substitution step.
pub const VERSION_PLACEHOLDER: &str = "&{version}";

/// Realm recorded in every exported entity.
pub const ROOT_REALM: &str = "/";

/// Entity type of authentication trees.
pub const AUTH_TREE_TYPE: &str = "AuthTree";

/// Entity type of scripts.
pub const SCRIPT_TYPE: &str = "Scripts";

/// Field holding the resource id.
const ID_FIELD: &str = "_id";

/// Field holding the revision marker.
pub(crate) const REVISION_FIELD: &str = "_rev";

/// Fields never written for node entities.
pub(crate) const NODE_SECRET_FIELDS: &[&str] = &["password", "password-encrypted"];

/// A fetched resource ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Resource fields as returned by the service, minus redacted ones.
    pub data: Map<String, Value>,
    /// Placement metadata.
    pub metadata: EntityMetadata,
}

/// Placement metadata of an exported entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    /// Realm path, always `/`.
    pub realm: String,
    /// Unresolved version placeholder.
    pub amster_version: String,
    /// Canonical entity type; also the output directory name.
    pub entity_type: String,
    /// Entity id; also the output file stem.
    pub entity_id: String,
    /// Reserved, always empty.
    pub path_params: Map<String, Value>,
}

impl EntityMetadata {
    /// Creates metadata for an entity in the root realm.
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            realm: ROOT_REALM.to_string(),
            amster_version: VERSION_PLACEHOLDER.to_string(),
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            path_params: Map::new(),
        }
    }
}

impl Entity {
    /// Wraps `data` with metadata for the given type and id.
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        data: Map<String, Value>,
    ) -> Self {
        Self {
            data,
            metadata: EntityMetadata::new(entity_type, entity_id),
        }
    }

    /// Wraps `data`, taking the entity id from its `_id` field.
    ///
    /// ## Errors
    ///
    /// Returns `ExportError::Schema` if `_id` is missing or not a string.
    pub fn with_data_id(entity_type: impl Into<String>, data: Map<String, Value>) -> ExportResult<Self> {
        let entity_type = entity_type.into();
        let id = match data.get(ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => {
                return Err(ExportError::Schema {
                    entity: entity_type,
                    message: "response has no `_id`".to_string(),
                })
            }
        };
        Ok(Self::new(entity_type, id, data))
    }

    /// Canonical entity type.
    pub fn entity_type(&self) -> &str {
        &self.metadata.entity_type
    }

    /// Entity id.
    pub fn entity_id(&self) -> &str {
        &self.metadata.entity_id
    }

    /// `type/id`, for messages.
    pub fn label(&self) -> String {
        format!("{}/{}", self.metadata.entity_type, self.metadata.entity_id)
    }

    /// Child node references listed under `data.nodes`.
    ///
    /// A missing or `null` `nodes` field means no children.
    ///
    /// ## Errors
    ///
    /// Returns `ExportError::Schema` if `nodes` has neither supported shape.
    pub fn child_nodes(&self) -> ExportResult<Vec<NodeRef>> {
        match self.data.get("nodes") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(nodes) => NodeRefs::deserialize(nodes)
                .map(NodeRefs::into_refs)
                .map_err(|e| ExportError::Schema {
                    entity: self.label(),
                    message: format!(
                        "`nodes` must be a list of {{_id, nodeType}} or a map of id to {{nodeType}} ({e})"
                    ),
                }),
        }
    }

    /// Script id attached through `data.script`, if any.
    pub fn script_ref(&self) -> Option<&str> {
        self.data
            .get("script")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// Removes `fields` from a response body.
pub(crate) fn redact(data: &mut Map<String, Value>, fields: &[&str]) {
    for field in fields {
        data.remove(*field);
    }
}

/// Reference to a child node found while walking a parent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef {
    /// Node id.
    pub id: String,
    /// Raw node type, as used in the node URL.
    pub node_type: String,
}

impl NodeRef {
    /// Creates a node reference.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
        }
    }
}

/// The two shapes a `nodes` collection comes in.
///
/// Trees key their nodes by id; page nodes list them with an `_id` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NodeRefs {
    /// `[{"_id": "a", "nodeType": "PageNode"}, ...]`
    List(Vec<ListedNode>),
    /// `{"a": {"nodeType": "PageNode"}, ...}`
    Keyed(BTreeMap<String, KeyedNode>),
}

/// Entry of the list shape.
#[derive(Debug, Deserialize)]
pub struct ListedNode {
    /// Node id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Raw node type.
    #[serde(rename = "nodeType")]
    pub node_type: String,
}

/// Entry of the keyed shape.
#[derive(Debug, Deserialize)]
pub struct KeyedNode {
    /// Raw node type.
    #[serde(rename = "nodeType")]
    pub node_type: String,
}

impl NodeRefs {
    /// Flattens either shape into references, in enumeration order.
    pub fn into_refs(self) -> Vec<NodeRef> {
        match self {
            Self::List(nodes) => nodes
                .into_iter()
                .map(|n| NodeRef::new(n.id, n.node_type))
                .collect(),
            Self::Keyed(nodes) => nodes
                .into_iter()
                .map(|(id, n)| NodeRef::new(id, n.node_type))
                .collect(),
        }
    }
}
