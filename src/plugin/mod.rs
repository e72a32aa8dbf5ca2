use tracing::{info, warn};

use crate::alias::{RealiasOutcome, realias};
use crate::document::VariablesDocument;
use crate::error::SyncError;
use crate::export::css::graph_css;
use crate::export::export_document;
use crate::graph::VariableGraph;
use crate::import::{clear_collections, import_document};
use crate::rename::rename;

pub mod messages;

use self::messages::{PluginMessage, PluginRequest, SavePayload, rename_scope};

#[derive(Debug)]
pub struct PluginSession<G> {
    graph: G,
    closed: bool,
}

impl<G: VariableGraph> PluginSession<G> {
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            closed: false,
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub async fn handle_json(&mut self, raw: &str) -> Result<Vec<PluginMessage>, SyncError> {
        let request = PluginRequest::from_json(raw)?;
        self.handle(request).await
    }

    pub async fn handle(
        &mut self,
        request: PluginRequest,
    ) -> Result<Vec<PluginMessage>, SyncError> {
        if self.closed {
            return Err(SyncError::SessionClosed);
        }
        info!(request = request.label(), "handling plugin request");

        match request {
            PluginRequest::Start | PluginRequest::ShowCss => Ok(vec![self.css_refresh().await?]),
            PluginRequest::Close => {
                self.closed = true;
                Ok(Vec::new())
            }
            PluginRequest::CreateRectangles { count } => {
                warn!(count, "shape creation is not supported by this host; ignoring");
                Ok(Vec::new())
            }
            PluginRequest::ImportJson { text } => {
                let document = VariablesDocument::from_json(&text)?;
                import_document(&mut self.graph, &document).await?;
                Ok(vec![self.css_refresh().await?])
            }
            PluginRequest::ShowJson => {
                let document = export_document(&self.graph).await?;
                Ok(vec![PluginMessage::PopulateTextarea(
                    document.to_json_pretty()?,
                )])
            }
            PluginRequest::SaveJson => {
                let document = export_document(&self.graph).await?;
                Ok(vec![PluginMessage::SaveJson(
                    self.save_payload(document.to_json_compact()?),
                )])
            }
            PluginRequest::ClearVars => {
                clear_collections(&mut self.graph).await?;
                Ok(vec![self.css_refresh().await?])
            }
            PluginRequest::SaveCss => {
                let css = graph_css(&self.graph).await?;
                Ok(vec![PluginMessage::SaveCss(self.save_payload(css))])
            }
            PluginRequest::ReplaceVars {
                find_string,
                replace_string,
                in_vars,
                in_collections,
                in_modes,
                in_groups,
            } => {
                let scope = rename_scope(in_vars, in_collections, in_modes, in_groups);
                let outcome = rename(&mut self.graph, &find_string, &replace_string, scope).await?;
                Ok(vec![
                    PluginMessage::FindreplaceInfo(outcome.summary),
                    self.css_refresh().await?,
                ])
            }
            PluginRequest::Realias { varname, alias } => {
                match realias(&mut self.graph, &varname, &alias).await? {
                    RealiasOutcome::Applied { .. } => Ok(vec![self.css_refresh().await?]),
                    RealiasOutcome::TargetMissing { message } => {
                        Ok(vec![PluginMessage::FindreplaceInfo(message)])
                    }
                }
            }
        }
    }

    async fn css_refresh(&self) -> Result<PluginMessage, SyncError> {
        Ok(PluginMessage::PopulateTextarea(graph_css(&self.graph).await?))
    }

    fn save_payload(&self, text: String) -> SavePayload {
        SavePayload {
            document_name: self.graph.document_name().to_owned(),
            text,
        }
    }
}
