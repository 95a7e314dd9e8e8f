//! Tagged result envelopes produced by repository streams.

use crate::error::Error;
use std::sync::Arc;

/// Fallback shown when an error emission carries no message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Unexpected error occurred";

/// A tagged result for repository calls.
///
/// Every repository stream emits a sequence of these; screen controllers fold
/// each emission into a fresh state snapshot. `Loading` carries no payload and
/// `Success` may carry an absent payload (a remote call that legitimately
/// returned nothing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    /// The call is in flight.
    Loading,
    /// The call finished with an optional payload.
    Success(Option<T>),
    /// The call failed with a display message.
    Error(String),
}

impl<T> Resource<T> {
    /// Success with a present payload.
    pub fn success(value: T) -> Self {
        Self::Success(Some(value))
    }

    /// Error from anything displayable.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// The error message, substituting the fallback when empty.
    pub fn display_message(&self) -> Option<&str> {
        match self {
            Self::Error(msg) if msg.is_empty() => Some(DEFAULT_ERROR_MESSAGE),
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Map the payload type, leaving Loading/Error untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Self::Loading => Resource::Loading,
            Self::Success(data) => Resource::Success(data.map(f)),
            Self::Error(msg) => Resource::Error(msg),
        }
    }
}

/// The identity-federation envelope.
///
/// Unlike [`Resource`], a failed emission carries the typed cause rather than
/// a pre-rendered display string, and a successful payload is never absent.
#[derive(Debug, Clone)]
pub enum Response<T> {
    /// The call is in flight.
    Loading,
    /// The call finished with a payload.
    Success(T),
    /// The call failed.
    Failure(Arc<Error>),
}

impl<T> Response<T> {
    /// Failure from a crate error.
    pub fn failure(err: Error) -> Self {
        Self::Failure(Arc::new(err))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}
