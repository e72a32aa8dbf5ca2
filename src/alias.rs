use tracing::info;

use crate::error::SyncError;
use crate::graph::{LiveVariable, VariableGraph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealiasOutcome {
    /// Number of variables whose every mode now points at the target.
    Applied { variables: usize },
    TargetMissing { message: String },
}

/// First variable named `name`, scanning collections in host order and each
/// collection's variables in id order.
pub async fn find_variable_by_name<G: VariableGraph>(
    graph: &G,
    name: &str,
) -> Result<Option<LiveVariable>, SyncError> {
    for collection in graph.local_collections().await? {
        for variable_id in &collection.variable_ids {
            let Some(variable) = graph.variable_by_id(variable_id).await? else {
                continue;
            };
            if variable.name == name {
                return Ok(Some(variable));
            }
        }
    }
    Ok(None)
}

pub async fn realias<G: VariableGraph>(
    graph: &mut G,
    variable_name: &str,
    target_name: &str,
) -> Result<RealiasOutcome, SyncError> {
    let Some(target) = find_variable_by_name(graph, target_name).await? else {
        return Ok(RealiasOutcome::TargetMissing {
            message: format!("Could not find variable '{target_name}'"),
        });
    };

    let mut variables = 0;
    for collection in graph.local_collections().await? {
        for variable_id in &collection.variable_ids {
            let Some(variable) = graph.variable_by_id(variable_id).await? else {
                continue;
            };
            if variable.name != variable_name {
                continue;
            }

            let alias = graph.create_variable_alias(&target.id).await?;
            for mode in &collection.modes {
                graph
                    .set_value_for_mode(&variable.id, &mode.mode_id, alias.clone().into())
                    .await?;
            }
            variables += 1;
        }
    }

    info!(
        variable = variable_name,
        target = target_name,
        variables,
        "realiased variables"
    );
    Ok(RealiasOutcome::Applied { variables })
}
