use indexmap::IndexMap;

use crate::document::{ModeValue, VariableAlias, VariableType};

pub mod memory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveMode {
    pub mode_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveCollection {
    pub id: String,
    pub name: String,
    pub modes: Vec<LiveMode>,
    pub variable_ids: Vec<String>,
}

impl LiveCollection {
    pub fn mode_named(&self, name: &str) -> Option<&LiveMode> {
        self.modes.iter().find(|mode| mode.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveVariable {
    pub id: String,
    pub name: String,
    pub collection_id: String,
    pub resolved_type: VariableType,
    /// Values keyed by host mode id.
    pub values_by_mode: IndexMap<String, ModeValue>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GraphError {
    #[error("variable collection `{collection_id}` not found")]
    CollectionNotFound { collection_id: String },

    #[error("variable `{variable_id}` not found")]
    VariableNotFound { variable_id: String },

    #[error("mode `{mode_id}` not found in collection `{collection_id}`")]
    ModeNotFound {
        collection_id: String,
        mode_id: String,
    },

    #[error("cannot remove mode `{mode_id}`: collection `{collection_id}` must keep one mode")]
    LastMode {
        collection_id: String,
        mode_id: String,
    },

    #[error("variable `{variable_id}` has type {expected}, cannot hold a {found} value")]
    TypeMismatch {
        variable_id: String,
        expected: VariableType,
        found: VariableType,
    },

    #[error("aliasing `{variable_id}` to `{target_id}` would create a cycle")]
    AliasCycle {
        variable_id: String,
        target_id: String,
    },
}

#[allow(async_fn_in_trait)]
pub trait VariableGraph {
    fn document_name(&self) -> &str;

    /// All local collections in host enumeration order.
    async fn local_collections(&self) -> Result<Vec<LiveCollection>, GraphError>;

    async fn collection_by_id(
        &self,
        collection_id: &str,
    ) -> Result<Option<LiveCollection>, GraphError>;

    async fn variable_by_id(&self, variable_id: &str) -> Result<Option<LiveVariable>, GraphError>;

    /// Creates a collection. The host gives it one default mode.
    async fn create_collection(&mut self, name: &str) -> Result<LiveCollection, GraphError>;

    async fn rename_collection(&mut self, collection_id: &str, name: &str)
    -> Result<(), GraphError>;

    /// Removes a collection together with its variables.
    async fn remove_collection(&mut self, collection_id: &str) -> Result<(), GraphError>;

    async fn add_mode(&mut self, collection_id: &str, name: &str) -> Result<String, GraphError>;

    async fn remove_mode(&mut self, collection_id: &str, mode_id: &str) -> Result<(), GraphError>;

    async fn rename_mode(
        &mut self,
        collection_id: &str,
        mode_id: &str,
        name: &str,
    ) -> Result<(), GraphError>;

    async fn create_variable(
        &mut self,
        name: &str,
        collection_id: &str,
        resolved_type: VariableType,
    ) -> Result<LiveVariable, GraphError>;

    async fn rename_variable(&mut self, variable_id: &str, name: &str) -> Result<(), GraphError>;

    async fn set_value_for_mode(
        &mut self,
        variable_id: &str,
        mode_id: &str,
        value: ModeValue,
    ) -> Result<(), GraphError>;

    async fn create_variable_alias(&self, variable_id: &str) -> Result<VariableAlias, GraphError>;
}
