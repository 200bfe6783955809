use thiserror::Error;

use crate::collection::Shape;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid selector '{0}'")]
    InvalidSelector(String),
    #[error("cannot wrap a {0} value in a collection")]
    NotAContainer(&'static str),
    #[error("{op} requires a sequence, found a {shape}")]
    ShapeMismatch { op: &'static str, shape: Shape },
    #[error("{op} called on an empty element set")]
    EmptySet { op: &'static str },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
}

pub type Result<T, E = QueryError> = std::result::Result<T, E>;
