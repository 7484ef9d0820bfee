use crate::content::ParseError;
use crate::model::MemoId;
use thiserror::Error;

/// Coarse classification of failures, used by clients to map errors onto
/// status codes or exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    PermissionDenied,
    Internal,
    Cancelled,
}

#[derive(Error, Debug)]
pub enum MemotagError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("memo not found: {0}")]
    MemoNotFound(MemoId),

    #[error("tag not found: {0}")]
    TagNotFound(String),

    #[error("no memos found with tag: {0}")]
    NoMemosWithTag(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("failed to parse memo content: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to restore memo content")]
    Restore(#[from] std::fmt::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("failed to write memo {id}: {source}")]
    MemoWrite {
        id: MemoId,
        #[source]
        source: Box<MemotagError>,
    },
}

impl MemotagError {
    /// Wraps a per-memo failure raised inside a multi-memo loop.
    pub fn for_memo(id: MemoId, source: MemotagError) -> Self {
        MemotagError::MemoWrite {
            id,
            source: Box::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MemotagError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            MemotagError::MemoNotFound(_)
            | MemotagError::TagNotFound(_)
            | MemotagError::NoMemosWithTag(_) => ErrorKind::NotFound,
            MemotagError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            MemotagError::Cancelled => ErrorKind::Cancelled,
            MemotagError::MemoWrite { source, .. } => source.kind(),
            MemotagError::Parse(_)
            | MemotagError::Restore(_)
            | MemotagError::Io(_)
            | MemotagError::Serialization(_)
            | MemotagError::Store(_)
            | MemotagError::Config(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, MemotagError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            MemotagError::InvalidArgument("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            MemotagError::NoMemosWithTag("/a".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            MemotagError::Store("boom".into()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(MemotagError::Cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_wrapped_memo_error_keeps_inner_kind() {
        let id = Uuid::new_v4();
        let err = MemotagError::for_memo(id, MemotagError::Store("disk full".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        let msg = err.to_string();
        assert!(msg.contains(&id.to_string()));
        assert!(msg.contains("disk full"));
    }
}
