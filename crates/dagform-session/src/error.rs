use dagform_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Unknown, expired or malformed session id.
    #[error("Invalid session")]
    NotFound(String),

    #[error("Session {0} has already been saved")]
    AlreadySaved(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
