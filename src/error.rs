use derive_more::{Display, IsVariant};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a `name:first:count` record could not be parsed.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Display, IsVariant)]
pub enum RecordError {
    #[display("incorrect number of fields")]
    IncorrectFieldCount,
    #[display("cannot get the id range")]
    BadIdRange,
}

#[derive(Debug, Error, IsVariant)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index {index} out of range for interval set of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("{reason}\nfile: {file}, line: {line}")]
    MalformedRecord { file: String, line: usize, reason: RecordError },

    #[error("unknown name: {0}")]
    KeyNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
