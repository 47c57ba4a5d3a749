use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Negative id, or an id that is already registered.
    InvalidDocumentId,
    /// A document word or stop word contains control bytes.
    InvalidWord,
    /// A stop word failed validation at construction.
    InvalidStopWord,
    /// A query token is empty after `-` stripping, doubles the `-`,
    /// or contains control bytes.
    InvalidQuery,
    /// Match requested for an id that is not registered.
    UnknownDocumentId,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error {
            kind,
            context: context.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
