use tracing::{debug, info};

use crate::error::SyncError;
use crate::graph::VariableGraph;

/// `groups` is accepted for protocol compatibility and currently renames
/// nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameScope {
    pub variables: bool,
    pub collections: bool,
    pub modes: bool,
    pub groups: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub replacements: usize,
    pub summary: String,
}

/// Replaces the first occurrence of `pattern` in every in-scope name.
pub async fn rename<G: VariableGraph>(
    graph: &mut G,
    pattern: &str,
    replacement: &str,
    scope: RenameScope,
) -> Result<RenameOutcome, SyncError> {
    let mut replacements = 0;

    if scope.variables {
        for collection in graph.local_collections().await? {
            for variable_id in &collection.variable_ids {
                let Some(variable) = graph.variable_by_id(variable_id).await? else {
                    continue;
                };
                if let Some(new_name) = replace_first(&variable.name, pattern, replacement) {
                    debug!(from = %variable.name, to = %new_name, "renaming variable");
                    graph.rename_variable(&variable.id, &new_name).await?;
                    replacements += 1;
                }
            }
        }
    }

    if scope.collections {
        for collection in graph.local_collections().await? {
            if let Some(new_name) = replace_first(&collection.name, pattern, replacement) {
                debug!(from = %collection.name, to = %new_name, "renaming collection");
                graph.rename_collection(&collection.id, &new_name).await?;
                replacements += 1;
            }
        }
    }

    if scope.modes {
        for collection in graph.local_collections().await? {
            for mode in &collection.modes {
                if let Some(new_name) = replace_first(&mode.name, pattern, replacement) {
                    debug!(
                        collection = %collection.name,
                        from = %mode.name,
                        to = %new_name,
                        "renaming mode"
                    );
                    graph
                        .rename_mode(&collection.id, &mode.mode_id, &new_name)
                        .await?;
                    replacements += 1;
                }
            }
        }
    }

    let summary = rename_summary(replacements, pattern, replacement);
    info!(replacements, pattern, replacement, "rename finished");
    Ok(RenameOutcome {
        replacements,
        summary,
    })
}

fn replace_first(name: &str, pattern: &str, replacement: &str) -> Option<String> {
    let renamed = name.replacen(pattern, replacement, 1);
    (renamed != name).then_some(renamed)
}

pub fn rename_summary(replacements: usize, pattern: &str, replacement: &str) -> String {
    let noun = if replacements == 1 {
        "instance"
    } else {
        "instances"
    };
    format!("Replaced {replacements} {noun} of {pattern} with {replacement}")
}

#[cfg(test)]
mod tests {
    use crate::document::VariableType;
    use crate::graph::VariableGraph;
    use crate::graph::memory::MemoryGraph;

    use super::{RenameScope, rename, rename_summary, replace_first};

    #[test]
    fn replace_first_only_touches_the_first_occurrence() {
        assert_eq!(
            replace_first("foofoo", "foo", "bar"),
            Some("barfoo".to_owned())
        );
        assert_eq!(replace_first("baz", "foo", "bar"), None);
        assert_eq!(replace_first("same", "same", "same"), None);
    }

    #[test]
    fn summary_uses_singular_for_exactly_one() {
        assert_eq!(
            rename_summary(1, "foo", "bar"),
            "Replaced 1 instance of foo with bar"
        );
        assert_eq!(
            rename_summary(0, "foo", "bar"),
            "Replaced 0 instances of foo with bar"
        );
        assert_eq!(
            rename_summary(3, "a", "b"),
            "Replaced 3 instances of a with b"
        );
    }

    #[tokio::test]
    async fn variable_scope_renames_only_variables() {
        let mut graph = MemoryGraph::new("Doc");
        let collection = graph.create_collection("foo tokens").await.expect("create");
        let variable = graph
            .create_variable("foofoo", &collection.id, VariableType::Float)
            .await
            .expect("variable");

        let outcome = rename(
            &mut graph,
            "foo",
            "bar",
            RenameScope {
                variables: true,
                ..RenameScope::default()
            },
        )
        .await
        .expect("rename");

        assert_eq!(outcome.replacements, 1);
        let renamed = graph
            .variable_by_id(&variable.id)
            .await
            .expect("read")
            .expect("variable should exist");
        assert_eq!(renamed.name, "barfoo");
        let collections = graph.local_collections().await.expect("collections");
        assert_eq!(collections[0].name, "foo tokens");
    }

    #[tokio::test]
    async fn collection_and_mode_scopes_count_every_change() {
        let mut graph = MemoryGraph::new("Doc");
        let collection = graph.create_collection("Light Theme").await.expect("create");
        graph
            .add_mode(&collection.id, "Light High Contrast")
            .await
            .expect("mode");
        graph.create_collection("Dark").await.expect("dark");

        let outcome = rename(
            &mut graph,
            "Light",
            "Day",
            RenameScope {
                collections: true,
                modes: true,
                groups: true,
                ..RenameScope::default()
            },
        )
        .await
        .expect("rename");

        assert_eq!(outcome.replacements, 2);
        assert_eq!(outcome.summary, "Replaced 2 instances of Light with Day");
        let collections = graph.local_collections().await.expect("collections");
        assert_eq!(collections[0].name, "Day Theme");
        assert_eq!(collections[0].modes[1].name, "Day High Contrast");
        assert_eq!(collections[1].name, "Dark");
    }
}
