use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Variable names must not be empty")]
    EmptyVariable,

    #[error("Variable '{0}' is listed more than once")]
    DuplicateVariable(String),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("Dependency does not exist: {from} -> {to}")]
    DependencyNotFound { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
