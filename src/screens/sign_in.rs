//! Sign-in screen controller.

use super::validation::{is_valid_email, is_valid_password};
use super::error_message;
use crate::repository::{IdentityService, Repository};
use crate::scope::Scope;
use crate::state::{Credential, Resource, Response, SignInScreenState, SignInState};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

/// Controller behind the sign-in screen.
///
/// Three independent flows live here: email/password sign-in, the one-tap
/// federation flow and the credential-exchange flow. Each folds into its own
/// state cell; failure in one does not touch the others.
pub struct SignInController {
    repository: Arc<dyn Repository>,
    identity: Arc<dyn IdentityService>,
    scope: Scope,
    sign_in: watch::Sender<SignInState>,
    screen: watch::Sender<SignInScreenState>,
    one_tap: watch::Sender<Response<Option<Credential>>>,
    with_credential: watch::Sender<Response<bool>>,
}

impl SignInController {
    pub fn new(repository: Arc<dyn Repository>, identity: Arc<dyn IdentityService>) -> Self {
        let (screen, _) = watch::channel(SignInScreenState {
            is_visible: true,
            ..Default::default()
        });
        let (sign_in, _) = watch::channel(SignInState::default());
        let (one_tap, _) = watch::channel(Response::Success(None));
        let (with_credential, _) = watch::channel(Response::Success(false));
        Self {
            repository,
            identity,
            scope: Scope::new(),
            sign_in,
            screen,
            one_tap,
            with_credential,
        }
    }

    pub fn sign_in_state(&self) -> watch::Receiver<SignInState> {
        self.sign_in.subscribe()
    }

    pub fn screen_state(&self) -> watch::Receiver<SignInScreenState> {
        self.screen.subscribe()
    }

    pub fn one_tap_response(&self) -> watch::Receiver<Response<Option<Credential>>> {
        self.one_tap.subscribe()
    }

    pub fn credential_response(&self) -> watch::Receiver<Response<bool>> {
        self.with_credential.subscribe()
    }

    /// Update the email field; trims whitespace and clears the inline error.
    pub fn set_email(&self, value: &str) {
        let trimmed = value.trim().to_string();
        self.screen.send_modify(|state| {
            state.email = trimmed;
            state.is_error = false;
        });
    }

    pub fn set_password(&self, value: &str) {
        let value = value.to_string();
        self.screen.send_modify(|state| state.password = value);
    }

    pub fn set_password_visible(&self, visible: bool) {
        self.screen
            .send_modify(|state| state.is_password_visible = visible);
    }

    pub fn set_form_visibility(&self, is_visible: bool, is_loading: bool) {
        self.screen.send_modify(|state| {
            state.is_visible = is_visible;
            state.is_loading = is_loading;
        });
    }

    /// Validate the current field values and sign in when they pass.
    ///
    /// Validation failure never reaches the repository; it only flips the
    /// inline `is_error` flag.
    pub fn validated_sign_in(&self) {
        let snapshot = self.screen.borrow().clone();
        if is_valid_email(&snapshot.email) && is_valid_password(&snapshot.password) {
            self.sign_in(&snapshot.email, &snapshot.password);
        } else {
            self.screen.send_modify(|state| state.is_error = true);
        }
    }

    fn sign_in(&self, email: &str, password: &str) {
        let mut stream = self.repository.sign_in(email, password);
        let repository = self.repository.clone();
        let sign_in = self.sign_in.clone();
        let screen = self.screen.clone();
        self.scope.spawn(async move {
            while let Some(result) = stream.next().await {
                match result {
                    Resource::Loading => {
                        sign_in.send_replace(SignInState::loading());
                        screen.send_modify(|state| {
                            state.is_visible = false;
                            state.is_loading = true;
                        });
                    }
                    Resource::Success(session) => {
                        sign_in.send_replace(SignInState::signed_in(session));
                        if let Err(err) = repository.save_user_exists(true).await {
                            warn!("failed to persist user-exists flag: {err}");
                        }
                        if let Err(err) = repository.refresh_cached_user().await {
                            warn!("failed to refresh cached user: {err}");
                        }
                    }
                    Resource::Error(message) => {
                        sign_in.send_replace(SignInState::error(error_message(message)));
                        screen.send_modify(|state| {
                            state.is_visible = true;
                            state.is_loading = false;
                        });
                    }
                }
            }
        });
    }

    /// Start the one-tap federation flow.
    pub fn one_tap_sign_in(&self) {
        let mut stream = self.identity.one_tap_sign_in();
        let cell = self.one_tap.clone();
        self.scope.spawn(async move {
            while let Some(result) = stream.next().await {
                cell.send_replace(result);
            }
        });
    }

    /// Exchange a provider credential for a session.
    pub fn sign_in_with_credential(&self, credential: Credential) {
        let mut stream = self.identity.sign_in_with_credential(credential);
        let cell = self.with_credential.clone();
        self.scope.spawn(async move {
            while let Some(result) = stream.next().await {
                cell.send_replace(result);
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
    use crate::repository::{MockIdentityService, MockRepository};
    use crate::state::Session;
    use futures::stream;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_stream::wrappers::ReceiverStream;

    fn session() -> Session {
        Session {
            user_id: "u-1".into(),
            email: "user@example.com".into(),
            token: "tok".into(),
        }
    }

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
    async fn test_invalid_fields_never_reach_the_repository() {
        let mut repository = MockRepository::new();
        repository.expect_sign_in().times(0);
        let controller = SignInController::new(
            Arc::new(repository),
            Arc::new(MockIdentityService::new()),
        );

        controller.set_email("");
        controller.set_password("");
        controller.validated_sign_in();

        assert!(controller.screen_state().borrow().is_error);
    }

    #[tokio::test]
    async fn test_editing_email_clears_the_inline_error() {
        let mut repository = MockRepository::new();
        repository.expect_sign_in().times(0);
        let controller = SignInController::new(
            Arc::new(repository),
            Arc::new(MockIdentityService::new()),
        );

        controller.validated_sign_in();
        assert!(controller.screen_state().borrow().is_error);

        controller.set_email(" user@example.com ");
        let screen = controller.screen_state().borrow().clone();
        assert!(!screen.is_error);
        assert_eq!(screen.email, "user@example.com");
    }

    #[tokio::test]
    async fn test_valid_sign_in_folds_loading_then_session() {
        let (tx, rx) = tokio::sync::mpsc::channel(4);
        let refreshes = Arc::new(AtomicUsize::new(0));
        let counted = refreshes.clone();

        let mut repository = MockRepository::new();
        repository
            .expect_sign_in()
            .times(1)
            .return_once(move |_, _| ReceiverStream::new(rx).boxed());
        repository
            .expect_save_user_exists()
            .times(1)
            .returning(|_| Ok(()));
        repository
            .expect_refresh_cached_user()
            .times(1)
            .returning(move || {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        let controller = SignInController::new(
            Arc::new(repository),
            Arc::new(MockIdentityService::new()),
        );
        let mut observed = controller.sign_in_state();

        controller.set_email("user@example.com");
        controller.set_password("validPass1");
        controller.validated_sign_in();

        tx.send(Resource::Loading).await.unwrap();
        observed.changed().await.unwrap();
        let state = observed.borrow_and_update().clone();
        assert!(state.is_loading);
        assert_eq!(state.session, None);

        tx.send(Resource::success(session())).await.unwrap();
        observed.changed().await.unwrap();
        let state = observed.borrow_and_update().clone();
        assert!(!state.is_loading);
        assert_eq!(state.session, Some(session()));
        assert_eq!(state.error, "");

        wait_until(|| refreshes.load(Ordering::SeqCst) == 1).await;
    }

    #[tokio::test]
    async fn test_error_emission_replaces_the_whole_state() {
        let mut repository = MockRepository::new();
        repository.expect_sign_in().times(1).return_once(|_, _| {
            stream::iter([
                Resource::Loading,
                Resource::<Session>::Error("wrong password".into()),
            ])
            .boxed()
        });

        let controller = SignInController::new(
            Arc::new(repository),
            Arc::new(MockIdentityService::new()),
        );
        let observed = controller.sign_in_state();

        controller.set_email("user@example.com");
        controller.set_password("validPass1");
        controller.validated_sign_in();

        wait_until(|| observed.borrow().error == "wrong password").await;
        let state = observed.borrow().clone();
        assert!(!state.is_loading);
        assert_eq!(state.session, None);

        let screen = controller.screen_state().borrow().clone();
        assert!(screen.is_visible);
        assert!(!screen.is_loading);
    }

    #[tokio::test]
    async fn test_one_tap_failure_leaves_other_flows_untouched() {
        let repository = MockRepository::new();
        let mut identity = MockIdentityService::new();
        identity.expect_one_tap_sign_in().return_once(|| {
            stream::iter([
                Response::Loading,
                Response::failure(crate::Error::auth("cancelled")),
            ])
            .boxed()
        });

        let controller = SignInController::new(Arc::new(repository), Arc::new(identity));
        let one_tap = controller.one_tap_response();

        controller.one_tap_sign_in();
        wait_until(|| one_tap.borrow().is_failure()).await;

        assert_eq!(controller.sign_in_state().borrow().clone(), SignInState::default());
        assert!(controller.credential_response().borrow().is_success());
    }

    #[tokio::test]
    async fn test_closed_screen_publishes_nothing() {
        let (tx, rx) = tokio::sync::mpsc::channel(4);
        let mut repository = MockRepository::new();
        repository
            .expect_sign_in()
            .times(1)
            .return_once(move |_, _| ReceiverStream::new(rx).boxed());

        let controller = SignInController::new(
            Arc::new(repository),
            Arc::new(MockIdentityService::new()),
        );
        let observed = controller.sign_in_state();

        controller.set_email("user@example.com");
        controller.set_password("validPass1");
        controller.validated_sign_in();
        controller.close();

        let _ = tx.send(Resource::Loading).await;
        let _ = tx.send(Resource::success(session())).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!observed.has_changed().unwrap_or(true));
        assert_eq!(observed.borrow().clone(), SignInState::default());
    }
}
