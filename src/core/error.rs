use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    InvalidParameter,
    DatabaseNotFound,
    CorruptDatabase,
    ClosedResource,
    ModeMismatch,
}

#[derive(Debug, ThisError)]
#[error("{kind:?}: {context}")]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error { kind, context: context.into() }
    }

    pub fn invalid_parameter(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, context)
    }

    pub fn corrupt(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::CorruptDatabase, context)
    }

    pub fn closed(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClosedResource, context)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
