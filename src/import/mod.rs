use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::document::{ModeValue, VariablesDocument, full_name};
use crate::error::SyncError;
use crate::graph::{LiveCollection, VariableGraph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAlias {
    pub variable_id: String,
    pub variable_name: String,
    pub collection_id: String,
    pub mode_name: String,
    pub target_full_name: String,
    /// Host id of the alias target in the exporting document.
    pub source_alias_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub collections_created: usize,
    pub variables_created: usize,
    pub literal_values_set: usize,
    pub aliases_resolved: usize,
    pub skipped_assignments: usize,
}

struct VariablePass {
    registry: IndexMap<String, String>,
    pending: Vec<PendingAlias>,
}

pub async fn import_document<G: VariableGraph>(
    graph: &mut G,
    document: &VariablesDocument,
) -> Result<ImportReport, SyncError> {
    let mut report = ImportReport::default();
    info!(collections = document.len(), "importing variables document");

    let created = create_collections(graph, document, &mut report).await?;
    let VariablePass { registry, pending } =
        create_variables(graph, document, &created, &mut report).await?;
    log_alias_requirements(graph, &pending).await?;
    resolve_aliases(graph, &registry, &pending, &mut report).await?;

    info!(
        collections_created = report.collections_created,
        variables_created = report.variables_created,
        literal_values_set = report.literal_values_set,
        aliases_resolved = report.aliases_resolved,
        skipped_assignments = report.skipped_assignments,
        "variables document imported"
    );
    Ok(report)
}

/// Pass 1. Returns created collection ids keyed by document key.
async fn create_collections<G: VariableGraph>(
    graph: &mut G,
    document: &VariablesDocument,
    report: &mut ImportReport,
) -> Result<IndexMap<String, String>, SyncError> {
    let mut created = IndexMap::with_capacity(document.len());

    for (collection_name, data) in document.collections() {
        let collection = graph.create_collection(collection_name).await?;
        report.collections_created += 1;

        let mut created_mode_ids = Vec::with_capacity(data.modes.len());
        for mode in &data.modes {
            created_mode_ids.push(graph.add_mode(&collection.id, &mode.name).await?);
        }

        let live_modes = graph
            .collection_by_id(&collection.id)
            .await?
            .map(|live| live.modes)
            .unwrap_or_default();
        for mode in live_modes.iter().rev() {
            if !created_mode_ids.contains(&mode.mode_id) {
                debug!(
                    collection = %collection_name,
                    mode = %mode.name,
                    "removing mode not present in document"
                );
                graph.remove_mode(&collection.id, &mode.mode_id).await?;
            }
        }

        created.insert(collection_name.clone(), collection.id);
    }

    Ok(created)
}

/// Pass 2. Builds the full-name registry and defers every alias.
async fn create_variables<G: VariableGraph>(
    graph: &mut G,
    document: &VariablesDocument,
    created: &IndexMap<String, String>,
    report: &mut ImportReport,
) -> Result<VariablePass, SyncError> {
    let mut registry = IndexMap::new();
    let mut pending = Vec::new();

    for (collection_name, data) in document.collections() {
        let Some(collection) = live_collection(graph, created, collection_name).await? else {
            continue;
        };

        for variable_data in &data.variables {
            let variable = graph
                .create_variable(&variable_data.name, &collection.id, variable_data.resolved_type)
                .await?;
            report.variables_created += 1;
            registry.insert(
                full_name(&collection.name, &variable_data.name),
                variable.id.clone(),
            );

            for (mode_name, value) in &variable_data.value {
                let Some(mode) = collection.mode_named(mode_name) else {
                    warn_missing_mode(&collection, mode_name);
                    report.skipped_assignments += 1;
                    continue;
                };

                match value {
                    ModeValue::Literal(_) => {
                        graph
                            .set_value_for_mode(&variable.id, &mode.mode_id, value.clone())
                            .await?;
                        report.literal_values_set += 1;
                    }
                    ModeValue::Alias(alias) => {
                        let Some(target_full_name) = alias.name.clone() else {
                            warn!(
                                variable = %variable_data.name,
                                mode = %mode_name,
                                alias_id = %alias.id,
                                "alias has no target name; skipping"
                            );
                            report.skipped_assignments += 1;
                            continue;
                        };
                        pending.push(PendingAlias {
                            variable_id: variable.id.clone(),
                            variable_name: variable_data.name.clone(),
                            collection_id: collection.id.clone(),
                            mode_name: mode_name.clone(),
                            target_full_name,
                            source_alias_id: alias.id.clone(),
                        });
                    }
                }
            }
        }
    }

    Ok(VariablePass { registry, pending })
}

/// Pass 3. Diagnostic only.
async fn log_alias_requirements<G: VariableGraph>(
    graph: &G,
    pending: &[PendingAlias],
) -> Result<(), SyncError> {
    for requirement in pending {
        let Some(collection) = graph.collection_by_id(&requirement.collection_id).await? else {
            continue;
        };
        let mode = collection
            .mode_named(&requirement.mode_name)
            .map(|mode| mode.name.as_str());
        debug!(
            variable = %requirement.variable_name,
            target = %requirement.target_full_name,
            mode = ?mode,
            alias_id = %requirement.source_alias_id,
            "variable needs alias"
        );
    }
    Ok(())
}

/// Pass 4.
async fn resolve_aliases<G: VariableGraph>(
    graph: &mut G,
    registry: &IndexMap<String, String>,
    pending: &[PendingAlias],
    report: &mut ImportReport,
) -> Result<(), SyncError> {
    for requirement in pending {
        let Some(collection) = graph.collection_by_id(&requirement.collection_id).await? else {
            report.skipped_assignments += 1;
            continue;
        };
        let Some(mode) = collection.mode_named(&requirement.mode_name) else {
            warn_missing_mode(&collection, &requirement.mode_name);
            report.skipped_assignments += 1;
            continue;
        };
        let Some(target_id) = registry.get(&requirement.target_full_name) else {
            warn!(
                variable = %requirement.variable_name,
                mode = %requirement.mode_name,
                target = %requirement.target_full_name,
                "alias target not found in document; skipping"
            );
            report.skipped_assignments += 1;
            continue;
        };

        let alias = graph.create_variable_alias(target_id).await?;
        graph
            .set_value_for_mode(&requirement.variable_id, &mode.mode_id, alias.into())
            .await?;
        report.aliases_resolved += 1;
    }
    Ok(())
}

async fn live_collection<G: VariableGraph>(
    graph: &G,
    created: &IndexMap<String, String>,
    collection_name: &str,
) -> Result<Option<LiveCollection>, SyncError> {
    let Some(collection_id) = created.get(collection_name) else {
        return Ok(None);
    };
    Ok(graph.collection_by_id(collection_id).await?)
}

fn warn_missing_mode(collection: &LiveCollection, mode_name: &str) {
    warn!(
        collection = %collection.name,
        mode = %mode_name,
        "mode not found in collection; skipping value"
    );
}

pub async fn clear_collections<G: VariableGraph>(graph: &mut G) -> Result<usize, SyncError> {
    let collections = graph.local_collections().await?;
    for collection in &collections {
        graph.remove_collection(&collection.id).await?;
    }
    info!(removed = collections.len(), "cleared variable collections");
    Ok(collections.len())
}
