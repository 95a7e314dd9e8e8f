//! Forgot-password screen controller.

use super::error_message;
use crate::repository::Repository;
use crate::scope::Scope;
use crate::state::{ResetPasswordState, Resource};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;

/// Controller behind the password-reset screen.
pub struct ResetPasswordController {
    repository: Arc<dyn Repository>,
    scope: Scope,
    state: watch::Sender<ResetPasswordState>,
}

impl ResetPasswordController {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            repository,
            scope: Scope::new(),
            state: watch::channel(ResetPasswordState::default()).0,
        }
    }

    pub fn state(&self) -> watch::Receiver<ResetPasswordState> {
        self.state.subscribe()
    }

    /// Request a reset email for the given address.
    pub fn reset_password(&self, email: &str) {
        let mut stream = self.repository.reset_password(email);
        let cell = self.state.clone();
        self.scope.spawn(async move {
            while let Some(result) = stream.next().await {
                match result {
                    Resource::Loading => {
                        cell.send_replace(ResetPasswordState {
                            is_loading: true,
                            ..Default::default()
                        });
                    }
                    Resource::Success(_) => {
                        cell.send_replace(ResetPasswordState {
                            successful: true,
                            ..Default::default()
                        });
                    }
                    Resource::Error(message) => {
                        cell.send_replace(ResetPasswordState {
                            error: error_message(message),
                            ..Default::default()
                        });
                    }
                }
            }
        });
    }

    /// Tear the screen down; in-flight subscriptions stop publishing.
    pub fn close(&self) {
        self.scope.cancel();
    }
}
