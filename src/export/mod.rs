use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::document::{
    CollectionData, ModeData, ModeValue, VariableData, VariablesDocument, full_name,
};
use crate::graph::{GraphError, LiveCollection, VariableGraph};

pub mod css;

/// Projects one live collection into its portable shape.
///
/// Alias values get their `name` rewritten to the target's full name. A target
/// variable or collection that can no longer be read leaves the alias as it
/// was.
pub async fn project_collection<G: VariableGraph>(
    graph: &G,
    collection: &LiveCollection,
) -> Result<CollectionData, GraphError> {
    let mut variables = Vec::with_capacity(collection.variable_ids.len());

    for variable_id in &collection.variable_ids {
        let Some(variable) = graph.variable_by_id(variable_id).await? else {
            debug!(
                collection = %collection.name,
                variable_id = %variable_id,
                "skipping unreadable variable"
            );
            continue;
        };

        let mut value = IndexMap::with_capacity(collection.modes.len());
        for mode in &collection.modes {
            let Some(raw) = variable.values_by_mode.get(&mode.mode_id) else {
                warn!(
                    variable = %variable.name,
                    mode = %mode.name,
                    "variable has no value for mode"
                );
                continue;
            };

            let mut raw = raw.clone();
            if let ModeValue::Alias(alias) = &mut raw {
                if let Some(target_name) = resolve_alias_name(graph, &alias.id).await? {
                    alias.name = Some(target_name);
                } else {
                    warn!(
                        variable = %variable.name,
                        mode = %mode.name,
                        target_id = %alias.id,
                        "alias target could not be resolved; keeping previous name"
                    );
                }
            }
            value.insert(mode.name.clone(), raw);
        }

        variables.push(VariableData {
            id: variable.id,
            name: variable.name,
            resolved_type: variable.resolved_type,
            value,
        });
    }

    Ok(CollectionData {
        name: collection.name.clone(),
        modes: collection
            .modes
            .iter()
            .map(|mode| ModeData {
                name: mode.name.clone(),
                id: mode.mode_id.clone(),
            })
            .collect(),
        variables,
    })
}

async fn resolve_alias_name<G: VariableGraph>(
    graph: &G,
    target_id: &str,
) -> Result<Option<String>, GraphError> {
    let Some(target) = graph.variable_by_id(target_id).await? else {
        return Ok(None);
    };
    let Some(collection) = graph.collection_by_id(&target.collection_id).await? else {
        return Ok(None);
    };
    Ok(Some(full_name(&collection.name, &target.name)))
}

pub async fn export_document<G: VariableGraph>(graph: &G) -> Result<VariablesDocument, GraphError> {
    let mut document = VariablesDocument::new();
    for collection in graph.local_collections().await? {
        let data = project_collection(graph, &collection).await?;
        document.insert(collection.name.clone(), data);
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use crate::document::{LiteralValue, ModeValue, VariableAlias, VariableType};
    use crate::graph::VariableGraph;
    use crate::graph::memory::MemoryGraph;

    use super::{export_document, project_collection};

    #[tokio::test]
    async fn aliases_are_rewritten_to_cross_collection_full_names() {
        let mut graph = MemoryGraph::new("Doc");
        let primitives = graph.create_collection("Base Tokens").await.expect("base");
        let semantic = graph.create_collection("Semantic").await.expect("semantic");
        let base_mode = primitives.modes[0].mode_id.clone();
        let semantic_mode = semantic.modes[0].mode_id.clone();

        let blue = graph
            .create_variable("blue-500", &primitives.id, VariableType::Float)
            .await
            .expect("blue");
        graph
            .set_value_for_mode(&blue.id, &base_mode, LiteralValue::Float(5.0).into())
            .await
            .expect("set blue");
        let accent = graph
            .create_variable("accent", &semantic.id, VariableType::Float)
            .await
            .expect("accent");
        let alias = graph.create_variable_alias(&blue.id).await.expect("alias");
        graph
            .set_value_for_mode(&accent.id, &semantic_mode, alias.into())
            .await
            .expect("set accent");

        let semantic = graph
            .collection_by_id(&semantic.id)
            .await
            .expect("read")
            .expect("collection should exist");
        let data = project_collection(&graph, &semantic)
            .await
            .expect("projection should succeed");

        let value = data.variables[0]
            .value
            .get("Mode 1")
            .expect("mode value should exist");
        assert_eq!(
            value,
            &ModeValue::Alias(
                VariableAlias::new(blue.id.clone()).with_name("--basetokens-blue-500")
            )
        );
    }

    #[tokio::test]
    async fn dangling_alias_keeps_its_previous_name() {
        let mut graph = MemoryGraph::new("Doc");
        let source = graph.create_collection("Core").await.expect("core");
        let other = graph.create_collection("Other").await.expect("other");
        let mode_id = source.modes[0].mode_id.clone();
        let target = graph
            .create_variable("gone", &other.id, VariableType::String)
            .await
            .expect("target");
        let variable = graph
            .create_variable("ref", &source.id, VariableType::String)
            .await
            .expect("variable");
        let alias = graph
            .create_variable_alias(&target.id)
            .await
            .expect("alias")
            .with_name("--stale-name");
        graph
            .set_value_for_mode(&variable.id, &mode_id, alias.into())
            .await
            .expect("set alias");
        graph.remove_collection(&other.id).await.expect("remove");

        let document = export_document(&graph).await.expect("export");
        let core = document.get("Core").expect("core should be exported");
        let value = core.variables[0].value.get("Mode 1").expect("value");
        let alias = value.as_alias().expect("value should still be an alias");
        assert_eq!(alias.name.as_deref(), Some("--stale-name"));
    }

    #[tokio::test]
    async fn export_preserves_host_order_of_collections_variables_and_modes() {
        let mut graph = MemoryGraph::new("Doc");
        let second = graph.create_collection("Spacing").await.expect("spacing");
        graph.create_collection("Color").await.expect("color");
        graph.add_mode(&second.id, "Compact").await.expect("mode");
        for name in ["md", "sm", "lg"] {
            graph
                .create_variable(name, &second.id, VariableType::Float)
                .await
                .expect("variable");
        }

        let document = export_document(&graph).await.expect("export");
        let keys: Vec<_> = document.collections().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["Spacing", "Color"]);

        let spacing = document.get("Spacing").expect("spacing");
        let names: Vec<_> = spacing.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["md", "sm", "lg"]);
        let modes: Vec<_> = spacing.modes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(modes, vec!["Mode 1", "Compact"]);
        let value_modes: Vec<_> = spacing.variables[0]
            .value
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(value_modes, vec!["Mode 1", "Compact"]);
    }
}
