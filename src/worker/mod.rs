//! Background price-alert worker.
//!
//! One call to [`PriceAlertWorker::run`] is one attempt: it resolves the user
//! tier, fetches the relevant price data and emits notifications. There is no
//! internal retry or cancellation; the schedule that invokes the run owns the
//! retry decision, and a failed run emits no partial notifications for the
//! branch that failed.

mod thresholds;

pub use thresholds::{crossed_down, crossed_up};

use crate::config::WorkerConfig;
use crate::error::{Error, Result};
use crate::notify::{
    DESCRIPTION_MARKET_CHANGE_NEGATIVE, DESCRIPTION_MARKET_CHANGE_POSITIVE, Notifier,
};
use crate::repository::Repository;
use crate::state::{Resource, UserState};
use futures::StreamExt;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Schedule-driven alert pass over the repository and notifier boundaries.
pub struct PriceAlertWorker {
    repository: Arc<dyn Repository>,
    notifier: Arc<dyn Notifier>,
    config: WorkerConfig,
}

impl PriceAlertWorker {
    pub fn new(
        repository: Arc<dyn Repository>,
        notifier: Arc<dyn Notifier>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            repository,
            notifier,
            config,
        }
    }

    /// Execute a single alert pass.
    pub async fn run(&self) -> Result<()> {
        let Some(tier) = self.repository.user_state().next().await else {
            return Err(Error::application("user tier unavailable"));
        };
        debug!(%tier, "starting alert run");

        match tier {
            UserState::Unauthed | UserState::Authed => self.reference_alert(tier).await,
            UserState::Premium => self.favorites_alert(tier).await,
        }
    }

    /// Non-premium users get a single market-direction notification derived
    /// from the reference coin. Only the first successful emission matters.
    async fn reference_alert(&self, tier: UserState) -> Result<()> {
        let mut stream = self.repository.coin_by_id(&self.config.reference_coin);
        while let Some(result) = stream.next().await {
            match result {
                Resource::Loading | Resource::Success(None) => {}
                Resource::Success(Some(coin)) => {
                    if coin.price_change_1d > Decimal::ZERO {
                        self.notifier.show_positive(tier);
                    } else if coin.price_change_1d < Decimal::ZERO {
                        self.notifier.show_negative(tier);
                    }
                    return Ok(());
                }
                Resource::Error(message) => return Err(Error::application(message)),
            }
        }
        Ok(())
    }

    /// Premium users get one notification per favorite coin crossing the
    /// configured threshold, keyed per coin so alerts do not collide.
    async fn favorites_alert(&self, tier: UserState) -> Result<()> {
        let mut stream = self.repository.favorites();
        while let Some(result) = stream.next().await {
            match result {
                Resource::Loading | Resource::Success(None) => {}
                Resource::Success(Some(coins)) => {
                    if coins.is_empty() {
                        return Ok(());
                    }
                    let magnitude = self.config.threshold_percent;
                    let mut emitted = 0u32;
                    for coin in &coins {
                        if crossed_up(coin.price_changed_1d, magnitude) {
                            self.notifier.show(
                                &coin.name,
                                DESCRIPTION_MARKET_CHANGE_POSITIVE,
                                coin.rank,
                                tier,
                            );
                            emitted += 1;
                        }
                        if crossed_down(coin.price_changed_1d, magnitude) {
                            self.notifier.show(
                                &coin.name,
                                DESCRIPTION_MARKET_CHANGE_NEGATIVE,
                                coin.rank,
                                tier,
                            );
                            emitted += 1;
                        }
                    }
                    info!(emitted, total = coins.len(), "favorite alerts evaluated");
                    return Ok(());
                }
                Resource::Error(message) => return Err(Error::application(message)),
            }
        }
        Ok(())
    }
}
