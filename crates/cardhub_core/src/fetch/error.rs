//! Typed fetch error taxonomy.
//!
//! # Invariants
//! - An adapter error that already is a `FetchError` is never re-wrapped.
//! - `FetchError` is cheap to clone so cached stage failures can be shared.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Boxed error type adapters return.
pub type AdapterError = Box<dyn Error + Send + Sync + 'static>;
/// Result alias for adapter capability calls.
pub type AdapterResult<T> = Result<T, AdapterError>;
/// Result alias for task pipeline calls.
pub type FetchResult<T> = Result<T, FetchError>;

/// Coded failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCredentials,
    FetchMetadataFailed,
    MalformedMetadata,
    FetchCardDataFailed,
    MalformedCardData,
    FetchBookFailed,
    MalformedBook,
    FetchAvatarFailed,
    DecodeFailed,
    MissingCredentialProvider,
    None,
}

impl ErrorKind {
    /// Stable code used in logs.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::FetchMetadataFailed => "fetch_metadata_failed",
            Self::MalformedMetadata => "malformed_metadata",
            Self::FetchCardDataFailed => "fetch_card_data_failed",
            Self::MalformedCardData => "malformed_card_data",
            Self::FetchBookFailed => "fetch_book_failed",
            Self::MalformedBook => "malformed_book",
            Self::FetchAvatarFailed => "fetch_avatar_failed",
            Self::DecodeFailed => "decode_failed",
            Self::MissingCredentialProvider => "missing_credential_provider",
            Self::None => "none",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Pipeline error carrying a coded kind and the originating cause.
#[derive(Debug, Clone)]
pub struct FetchError {
    kind: ErrorKind,
    message: String,
    source: Option<Arc<dyn Error + Send + Sync + 'static>>,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an adapter error into `kind` unless it is already typed.
    pub fn wrap(kind: ErrorKind, err: AdapterError) -> Self {
        match err.downcast::<FetchError>() {
            Ok(typed) => *typed,
            Err(other) => Self {
                kind,
                message: other.to_string(),
                source: Some(Arc::from(other)),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn Error + 'static))
    }
}

/// Returns the coded kind of `err`, or [`ErrorKind::None`] for untyped errors.
pub fn error_kind_of(err: &(dyn Error + 'static)) -> ErrorKind {
    err.downcast_ref::<FetchError>()
        .map_or(ErrorKind::None, FetchError::kind)
}

#[cfg(test)]
mod tests {
    use super::{error_kind_of, AdapterError, ErrorKind, FetchError};
    use std::error::Error;
    use std::io;

    #[test]
    fn wrap_assigns_kind_to_untyped_errors() {
        let err: AdapterError = Box::new(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        let wrapped = FetchError::wrap(ErrorKind::FetchMetadataFailed, err);
        assert_eq!(wrapped.kind(), ErrorKind::FetchMetadataFailed);
        assert_eq!(wrapped.message(), "timed out");
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn wrap_keeps_typed_errors_unchanged() {
        let typed = FetchError::new(ErrorKind::InvalidCredentials, "token expired");
        let wrapped = FetchError::wrap(ErrorKind::FetchMetadataFailed, Box::new(typed));
        assert_eq!(wrapped.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(wrapped.to_string(), "invalid_credentials: token expired");
    }

    #[test]
    fn error_kind_of_reports_none_for_foreign_errors() {
        let foreign = io::Error::new(io::ErrorKind::Other, "boom");
        assert_eq!(error_kind_of(&foreign), ErrorKind::None);
        let typed = FetchError::new(ErrorKind::DecodeFailed, "bad png");
        assert_eq!(error_kind_of(&typed), ErrorKind::DecodeFailed);
    }
}
