//! Authentication screen state.

use serde::{Deserialize, Serialize};

/// An authenticated session returned by the sign-in endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Backend user id.
    pub user_id: String,
    /// Account email.
    pub email: String,
    /// Bearer token for subsequent calls.
    pub token: String,
}

/// A federated-identity credential handed back by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Identity provider name (e.g. "google").
    pub provider: String,
    /// Provider-issued token to exchange for a session.
    pub id_token: String,
}

/// Snapshot of the email/password sign-in call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignInState {
    /// Whether the sign-in call is in flight.
    pub is_loading: bool,
    /// The established session, if any.
    pub session: Option<Session>,
    /// Error message; empty means no error.
    pub error: String,
}

impl SignInState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    pub fn signed_in(session: Option<Session>) -> Self {
        Self {
            session,
            ..Default::default()
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            ..Default::default()
        }
    }
}

/// Snapshot of the registration call. Same shape as sign-in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpState {
    pub is_loading: bool,
    pub session: Option<Session>,
    pub error: String,
}

/// Snapshot of the password-reset call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetPasswordState {
    /// Whether the reset call is in flight.
    pub is_loading: bool,
    /// Whether the reset email was accepted.
    pub successful: bool,
    /// Error message; empty means no error.
    pub error: String,
}

/// Editable state local to the sign-in screen.
///
/// `is_error` is the inline field-validation flag; it is independent of the
/// envelope error carried by [`SignInState`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignInScreenState {
    pub email: String,
    pub password: String,
    /// Inline validation failed for the current field values.
    pub is_error: bool,
    pub is_password_visible: bool,
    /// Whether the form (as opposed to the progress indicator) is shown.
    pub is_visible: bool,
    pub is_loading: bool,
}
