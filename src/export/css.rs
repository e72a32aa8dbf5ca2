use std::fmt::Write as _;

use crate::codec::render_mode_value;
use crate::document::{CollectionData, VariablesDocument, collection_slug};
use crate::graph::{GraphError, VariableGraph};

use super::project_collection;

pub fn render_css(document: &VariablesDocument) -> String {
    render_collections(document.collections().map(|(_, collection)| collection))
}

/// Renders collections as a single `:root` block, one commented section per
/// collection. Declarations are named `--<collection>-<variable>[-<mode>]`;
/// the mode suffix is only added when the collection has more than one mode.
pub fn render_collections<'a>(
    collections: impl IntoIterator<Item = &'a CollectionData>,
) -> String {
    let mut css = String::from(":root {\n");

    for collection in collections {
        let _ = write!(css, "\n  /* {} */\n\n", collection.name);
        let collection_slug = collection_slug(&collection.name);
        let multi_mode = collection.modes.len() > 1;

        for variable in &collection.variables {
            let variable_slug = variable_slug(&variable.name);
            for (mode_name, value) in &variable.value {
                let Some(rendered) = render_mode_value(value, variable.resolved_type) else {
                    continue;
                };
                let mode_suffix = if multi_mode {
                    format!("-{}", mode_name.to_lowercase())
                } else {
                    String::new()
                };
                let _ = writeln!(
                    css,
                    "  --{collection_slug}-{variable_slug}{mode_suffix}: {rendered};"
                );
            }
        }
    }

    css.push_str("}\n");
    css
}

pub fn variable_slug(variable_name: &str) -> String {
    variable_name
        .chars()
        .map(|ch| if ch.is_whitespace() || ch == '/' { '-' } else { ch })
        .collect()
}

/// Projects every live collection, same-named ones included, and renders them.
pub async fn graph_css<G: VariableGraph>(graph: &G) -> Result<String, GraphError> {
    let mut projected = Vec::new();
    for collection in graph.local_collections().await? {
        projected.push(project_collection(graph, &collection).await?);
    }
    Ok(render_collections(&projected))
}
