use crate::graph::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("malformed variables document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error("failed to serialize variables document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid plugin request: {reason}")]
    InvalidRequest { reason: String },

    #[error("plugin session is closed")]
    SessionClosed,
}
