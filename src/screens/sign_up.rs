//! Registration screen controller. Same validated shape as sign-in.

use super::validation::{is_valid_email, is_valid_password};
use super::error_message;
use crate::repository::Repository;
use crate::scope::Scope;
use crate::state::{Resource, SignUpState};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

pub struct SignUpController {
    repository: Arc<dyn Repository>,
    scope: Scope,
    sign_up: watch::Sender<SignUpState>,
    is_error: watch::Sender<bool>,
}

impl SignUpController {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            repository,
            scope: Scope::new(),
            sign_up: watch::channel(SignUpState::default()).0,
            is_error: watch::channel(false).0,
        }
    }

    pub fn sign_up_state(&self) -> watch::Receiver<SignUpState> {
        self.sign_up.subscribe()
    }

    /// Inline validation flag for the field decorations.
    pub fn is_error(&self) -> watch::Receiver<bool> {
        self.is_error.subscribe()
    }

    /// Validate and register; invalid fields never reach the repository.
    pub fn validated_sign_up(&self, email: &str, password: &str) {
        let email = email.trim();
        if !is_valid_email(email) || !is_valid_password(password) {
            self.is_error.send_replace(true);
            return;
        }
        self.is_error.send_replace(false);

        let mut stream = self.repository.sign_up(email, password);
        let repository = self.repository.clone();
        let cell = self.sign_up.clone();
        self.scope.spawn(async move {
            while let Some(result) = stream.next().await {
                match result {
                    Resource::Loading => {
                        cell.send_replace(SignUpState {
                            is_loading: true,
                            ..Default::default()
                        });
                    }
                    Resource::Success(session) => {
                        cell.send_replace(SignUpState {
                            session,
                            ..Default::default()
                        });
                        if let Err(err) = repository.save_user_exists(true).await {
                            warn!("failed to persist user-exists flag: {err}");
                        }
                    }
                    Resource::Error(message) => {
                        cell.send_replace(SignUpState {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockRepository;
    use crate::state::Session;
    use futures::stream;
    use std::time::Duration;

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_invalid_fields_flip_the_error_flag_only() {
        let mut repository = MockRepository::new();
        repository.expect_sign_up().times(0);

        let controller = SignUpController::new(Arc::new(repository));
        controller.validated_sign_up("user@example.com", "short");

        assert!(*controller.is_error().borrow());
    }

    #[tokio::test]
    async fn test_valid_registration_establishes_a_session() {
        let mut repository = MockRepository::new();
        repository.expect_sign_up().times(1).return_once(|_, _| {
            stream::iter([
                Resource::Loading,
                Resource::success(Session::default()),
            ])
            .boxed()
        });
        repository
            .expect_save_user_exists()
            .times(1)
            .returning(|_| Ok(()));

        let controller = SignUpController::new(Arc::new(repository));
        let observed = controller.sign_up_state();
        controller.validated_sign_up("user@example.com", "validPass1");

        wait_until(|| observed.borrow().session.is_some()).await;
        assert!(!*controller.is_error().borrow());
    }
}
