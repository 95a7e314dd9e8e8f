//! Main application module.
//!
//! `App` wires the configuration into the repository, notifier and worker
//! schedule, and hands out screen controllers sharing that repository.

use crate::config::Config;
use crate::error::Result;
use crate::notify::{LogNotifier, Notifier};
use crate::repository::{DisabledIdentityService, IdentityService, RestRepository};
use crate::scope::Scope;
use crate::screens::{
    CoinDetailController, NewsController, ResetPasswordController, SignInController,
    SignUpController,
};
use crate::worker::PriceAlertWorker;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// The main application.
pub struct App {
    config: Config,
    repository: Arc<RestRepository>,
    identity: Arc<dyn IdentityService>,
    notifier: Arc<dyn Notifier>,
    scope: Scope,
}

impl App {
    /// Create a new application from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let repository = Arc::new(RestRepository::builder().config(config.clone()).build()?);
        Ok(Self {
            config,
            repository,
            identity: Arc::new(DisabledIdentityService),
            notifier: Arc::new(LogNotifier),
            scope: Scope::new(),
        })
    }

    /// Swap the notification transport.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Swap the identity-federation backend.
    pub fn with_identity(mut self, identity: Arc<dyn IdentityService>) -> Self {
        self.identity = identity;
        self
    }

    /// Controller for a coin detail screen.
    pub fn coin_detail(&self, coin_id: impl Into<String>) -> CoinDetailController {
        CoinDetailController::new(
            self.repository.clone(),
            coin_id,
            self.config.auth.favorites_limit,
        )
    }

    /// Controller for the sign-in screen.
    pub fn sign_in(&self) -> SignInController {
        SignInController::new(self.repository.clone(), self.identity.clone())
    }

    /// Controller for the registration screen.
    pub fn sign_up(&self) -> SignUpController {
        SignUpController::new(self.repository.clone())
    }

    /// Controller for the news screen.
    pub fn news(&self) -> NewsController {
        NewsController::new(self.repository.clone())
    }

    /// Controller for the password-reset screen.
    pub fn reset_password(&self) -> ResetPasswordController {
        ResetPasswordController::new(self.repository.clone())
    }

    /// Run the alert schedule until ctrl-c.
    ///
    /// Each tick is a single worker attempt; a failed run is logged and the
    /// schedule simply waits for the next tick.
    pub async fn run(&mut self) -> Result<()> {
        let worker = PriceAlertWorker::new(
            self.repository.clone(),
            self.notifier.clone(),
            self.config.worker.clone(),
        );
        let period = Duration::from_secs(self.config.worker.interval_secs.max(1));
        let mut interval = tokio::time::interval(period);
        let mut cancelled = self.scope.cancelled();

        info!(interval_secs = period.as_secs(), "alert schedule started");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(err) = worker.run().await {
                        error!("alert run failed: {err}");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutting down");
                    break;
                }
                _ = cancelled.changed() => break,
            }
        }

        self.scope.cancel();
        Ok(())
    }

    /// Stop the schedule from another task.
    pub fn shutdown(&self) {
        self.scope.cancel();
    }
}
