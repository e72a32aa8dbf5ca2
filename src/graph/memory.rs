use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::document::{ModeValue, VariableAlias, VariableType};

use super::{GraphError, LiveCollection, LiveMode, LiveVariable, VariableGraph};

pub const DEFAULT_MODE_NAME: &str = "Mode 1";

#[derive(Debug, Clone)]
pub struct MemoryGraph {
    document_name: String,
    collections: Vec<LiveCollection>,
    variables: IndexMap<String, LiveVariable>,
    next_collection: u64,
    next_variable: u64,
    next_mode: u64,
}

impl MemoryGraph {
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            collections: Vec::new(),
            variables: IndexMap::new(),
            next_collection: 1,
            next_variable: 1,
            next_mode: 0,
        }
    }

    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    fn collection_mut(&mut self, collection_id: &str) -> Result<&mut LiveCollection, GraphError> {
        self.collections
            .iter_mut()
            .find(|collection| collection.id == collection_id)
            .ok_or_else(|| GraphError::CollectionNotFound {
                collection_id: collection_id.to_owned(),
            })
    }

    fn collection(&self, collection_id: &str) -> Result<&LiveCollection, GraphError> {
        self.collections
            .iter()
            .find(|collection| collection.id == collection_id)
            .ok_or_else(|| GraphError::CollectionNotFound {
                collection_id: collection_id.to_owned(),
            })
    }

    fn variable(&self, variable_id: &str) -> Result<&LiveVariable, GraphError> {
        self.variables
            .get(variable_id)
            .ok_or_else(|| GraphError::VariableNotFound {
                variable_id: variable_id.to_owned(),
            })
    }

    fn variable_mut(&mut self, variable_id: &str) -> Result<&mut LiveVariable, GraphError> {
        self.variables
            .get_mut(variable_id)
            .ok_or_else(|| GraphError::VariableNotFound {
                variable_id: variable_id.to_owned(),
            })
    }

    fn allocate_mode_id(&mut self, collection_seq: &str) -> String {
        let mode_id = format!("{collection_seq}:{}", self.next_mode);
        self.next_mode += 1;
        mode_id
    }

    /// Whether following aliases from `start` in any mode reaches `needle`.
    fn alias_chain_reaches(&self, start: &str, needle: &str) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack = vec![start.to_owned()];

        while let Some(current) = stack.pop() {
            if current == needle {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(variable) = self.variables.get(&current) {
                stack.extend(
                    variable
                        .values_by_mode
                        .values()
                        .filter_map(ModeValue::as_alias)
                        .map(|alias| alias.id.clone()),
                );
            }
        }

        false
    }
}

impl VariableGraph for MemoryGraph {
    fn document_name(&self) -> &str {
        &self.document_name
    }

    async fn local_collections(&self) -> Result<Vec<LiveCollection>, GraphError> {
        Ok(self.collections.clone())
    }

    async fn collection_by_id(
        &self,
        collection_id: &str,
    ) -> Result<Option<LiveCollection>, GraphError> {
        Ok(self
            .collections
            .iter()
            .find(|collection| collection.id == collection_id)
            .cloned())
    }

    async fn variable_by_id(&self, variable_id: &str) -> Result<Option<LiveVariable>, GraphError> {
        Ok(self.variables.get(variable_id).cloned())
    }

    async fn create_collection(&mut self, name: &str) -> Result<LiveCollection, GraphError> {
        let seq = self.next_collection.to_string();
        self.next_collection += 1;
        let default_mode = LiveMode {
            mode_id: self.allocate_mode_id(&seq),
            name: DEFAULT_MODE_NAME.to_owned(),
        };
        let collection = LiveCollection {
            id: format!("VariableCollectionId:{seq}"),
            name: name.to_owned(),
            modes: vec![default_mode],
            variable_ids: Vec::new(),
        };
        self.collections.push(collection.clone());
        Ok(collection)
    }

    async fn rename_collection(
        &mut self,
        collection_id: &str,
        name: &str,
    ) -> Result<(), GraphError> {
        self.collection_mut(collection_id)?.name = name.to_owned();
        Ok(())
    }

    async fn remove_collection(&mut self, collection_id: &str) -> Result<(), GraphError> {
        let index = self
            .collections
            .iter()
            .position(|collection| collection.id == collection_id)
            .ok_or_else(|| GraphError::CollectionNotFound {
                collection_id: collection_id.to_owned(),
            })?;
        let removed = self.collections.remove(index);
        for variable_id in &removed.variable_ids {
            self.variables.shift_remove(variable_id);
        }
        Ok(())
    }

    async fn add_mode(&mut self, collection_id: &str, name: &str) -> Result<String, GraphError> {
        let collection = self.collection(collection_id)?;
        let seq = collection
            .id
            .rsplit(':')
            .next()
            .unwrap_or_default()
            .to_owned();
        let source_mode_id = collection.modes.first().map(|mode| mode.mode_id.clone());
        let variable_ids = collection.variable_ids.clone();

        let mode_id = self.allocate_mode_id(&seq);
        self.collection_mut(collection_id)?.modes.push(LiveMode {
            mode_id: mode_id.clone(),
            name: name.to_owned(),
        });

        for variable_id in variable_ids {
            let variable = self.variable_mut(&variable_id)?;
            let seeded = source_mode_id
                .as_ref()
                .and_then(|source| variable.values_by_mode.get(source).cloned())
                .unwrap_or_else(|| variable.resolved_type.default_value().into());
            variable.values_by_mode.insert(mode_id.clone(), seeded);
        }

        Ok(mode_id)
    }

    async fn remove_mode(&mut self, collection_id: &str, mode_id: &str) -> Result<(), GraphError> {
        let collection = self.collection_mut(collection_id)?;
        let index = collection
            .modes
            .iter()
            .position(|mode| mode.mode_id == mode_id)
            .ok_or_else(|| GraphError::ModeNotFound {
                collection_id: collection_id.to_owned(),
                mode_id: mode_id.to_owned(),
            })?;
        if collection.modes.len() == 1 {
            return Err(GraphError::LastMode {
                collection_id: collection_id.to_owned(),
                mode_id: mode_id.to_owned(),
            });
        }
        collection.modes.remove(index);
        let variable_ids = collection.variable_ids.clone();

        for variable_id in variable_ids {
            self.variable_mut(&variable_id)?
                .values_by_mode
                .shift_remove(mode_id);
        }
        Ok(())
    }

    async fn rename_mode(
        &mut self,
        collection_id: &str,
        mode_id: &str,
        name: &str,
    ) -> Result<(), GraphError> {
        let collection = self.collection_mut(collection_id)?;
        let mode = collection
            .modes
            .iter_mut()
            .find(|mode| mode.mode_id == mode_id)
            .ok_or_else(|| GraphError::ModeNotFound {
                collection_id: collection_id.to_owned(),
                mode_id: mode_id.to_owned(),
            })?;
        mode.name = name.to_owned();
        Ok(())
    }

    async fn create_variable(
        &mut self,
        name: &str,
        collection_id: &str,
        resolved_type: VariableType,
    ) -> Result<LiveVariable, GraphError> {
        let variable_id = format!("VariableID:{}", self.next_variable);
        let collection = self.collection_mut(collection_id)?;
        let values_by_mode: IndexMap<String, ModeValue> = collection
            .modes
            .iter()
            .map(|mode| (mode.mode_id.clone(), resolved_type.default_value().into()))
            .collect();
        collection.variable_ids.push(variable_id.clone());
        self.next_variable += 1;

        let variable = LiveVariable {
            id: variable_id.clone(),
            name: name.to_owned(),
            collection_id: collection_id.to_owned(),
            resolved_type,
            values_by_mode,
        };
        self.variables.insert(variable_id, variable.clone());
        Ok(variable)
    }

    async fn rename_variable(&mut self, variable_id: &str, name: &str) -> Result<(), GraphError> {
        self.variable_mut(variable_id)?.name = name.to_owned();
        Ok(())
    }

    async fn set_value_for_mode(
        &mut self,
        variable_id: &str,
        mode_id: &str,
        value: ModeValue,
    ) -> Result<(), GraphError> {
        let variable = self.variable(variable_id)?;
        let expected = variable.resolved_type;
        let collection = self.collection(&variable.collection_id)?;
        if !collection.modes.iter().any(|mode| mode.mode_id == mode_id) {
            return Err(GraphError::ModeNotFound {
                collection_id: collection.id.clone(),
                mode_id: mode_id.to_owned(),
            });
        }

        let found = match &value {
            ModeValue::Literal(literal) => literal.variable_type(),
            ModeValue::Alias(alias) => {
                let target = self.variable(&alias.id)?;
                if self.alias_chain_reaches(&target.id, variable_id) {
                    return Err(GraphError::AliasCycle {
                        variable_id: variable_id.to_owned(),
                        target_id: target.id.clone(),
                    });
                }
                target.resolved_type
            }
        };
        if found != expected {
            return Err(GraphError::TypeMismatch {
                variable_id: variable_id.to_owned(),
                expected,
                found,
            });
        }

        self.variable_mut(variable_id)?
            .values_by_mode
            .insert(mode_id.to_owned(), value);
        Ok(())
    }

    async fn create_variable_alias(&self, variable_id: &str) -> Result<VariableAlias, GraphError> {
        let variable = self.variable(variable_id)?;
        Ok(VariableAlias::new(variable.id.clone()))
    }
}
