//! Coin detail screen controller.

use super::error_message;
use crate::repository::Repository;
use crate::scope::Scope;
use crate::state::{
    ChartState, Coin, CoinState, DialogState, FavoriteCoin, FavoriteMessages, FavoriteState,
    Resource, TimeRange, UserState,
};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

/// A favorite-set mutation requested by the screen.
#[derive(Debug, Clone)]
pub enum FavoriteEvent {
    Add(FavoriteCoin),
    Remove(FavoriteCoin),
}

/// Controller behind the coin detail screen.
pub struct CoinDetailController {
    repository: Arc<dyn Repository>,
    scope: Scope,
    coin_id: String,
    favorites_limit: usize,
    coin: watch::Sender<CoinState>,
    chart: watch::Sender<ChartState>,
    favorite: watch::Sender<FavoriteState>,
    favorite_msg: watch::Sender<FavoriteMessages>,
    remove_dialog: watch::Sender<DialogState>,
    premium_dialog: watch::Sender<DialogState>,
    side_effect: watch::Sender<bool>,
    auth_state: watch::Sender<UserState>,
}

impl CoinDetailController {
    pub fn new(
        repository: Arc<dyn Repository>,
        coin_id: impl Into<String>,
        favorites_limit: usize,
    ) -> Self {
        Self {
            repository,
            scope: Scope::new(),
            coin_id: coin_id.into(),
            favorites_limit,
            coin: watch::channel(CoinState::default()).0,
            chart: watch::channel(ChartState::default()).0,
            favorite: watch::channel(FavoriteState::default()).0,
            favorite_msg: watch::channel(FavoriteMessages::default()).0,
            remove_dialog: watch::channel(DialogState::default()).0,
            premium_dialog: watch::channel(DialogState::default()).0,
            side_effect: watch::channel(false).0,
            auth_state: watch::channel(UserState::default()).0,
        }
    }

    pub fn coin_state(&self) -> watch::Receiver<CoinState> {
        self.coin.subscribe()
    }

    pub fn chart_state(&self) -> watch::Receiver<ChartState> {
        self.chart.subscribe()
    }

    pub fn favorite_state(&self) -> watch::Receiver<FavoriteState> {
        self.favorite.subscribe()
    }

    pub fn favorite_messages(&self) -> watch::Receiver<FavoriteMessages> {
        self.favorite_msg.subscribe()
    }

    pub fn remove_dialog(&self) -> watch::Receiver<DialogState> {
        self.remove_dialog.subscribe()
    }

    pub fn premium_dialog(&self) -> watch::Receiver<DialogState> {
        self.premium_dialog.subscribe()
    }

    /// Toggled to prompt a sign-in redirect for unauthenticated users.
    pub fn side_effect(&self) -> watch::Receiver<bool> {
        self.side_effect.subscribe()
    }

    /// Fetch the coin and its default chart window.
    pub fn load(&self) {
        self.get_coin();
        self.get_chart(TimeRange::OneDay);
    }

    /// Re-resolve the user tier.
    pub fn refresh_user_state(&self) {
        let mut stream = self.repository.user_state();
        let cell = self.auth_state.clone();
        self.scope.spawn(async move {
            while let Some(state) = stream.next().await {
                cell.send_replace(state);
            }
        });
    }

    /// Switch the chart window. Does not cancel an in-flight chart fold;
    /// whichever finishes last wins the cell.
    pub fn on_time_range_changed(&self, range: TimeRange) {
        let coin_loaded = self.coin.borrow().coin.is_some();
        if coin_loaded {
            self.get_chart(range);
        }
    }

    fn get_coin(&self) {
        let mut stream = self.repository.coin_by_id(&self.coin_id);
        let repository = self.repository.clone();
        let coin_cell = self.coin.clone();
        let favorite_cell = self.favorite.clone();
        self.scope.spawn(async move {
            while let Some(result) = stream.next().await {
                match result {
                    Resource::Loading => {
                        coin_cell.send_replace(CoinState::loading());
                    }
                    Resource::Success(coin) => {
                        coin_cell.send_replace(CoinState {
                            coin: coin.clone(),
                            ..Default::default()
                        });
                        if let Some(coin) = coin {
                            let status = repository.is_favorite(&coin.to_favorite()).await;
                            favorite_cell.send_replace(status);
                        }
                    }
                    Resource::Error(message) => {
                        coin_cell.send_replace(CoinState::error(error_message(message)));
                    }
                }
            }
        });
    }

    fn get_chart(&self, range: TimeRange) {
        let mut stream = self.repository.chart(&self.coin_id, range);
        let chart_cell = self.chart.clone();
        self.scope.spawn(async move {
            while let Some(result) = stream.next().await {
                match result {
                    Resource::Loading => {
                        chart_cell.send_replace(ChartState::loading());
                    }
                    Resource::Success(points) => {
                        chart_cell
                            .send_replace(ChartState::loaded(points.unwrap_or_default()));
                    }
                    Resource::Error(message) => {
                        chart_cell.send_replace(ChartState::error(error_message(message)));
                    }
                }
            }
        });
    }

    /// Favorite button intent, gated by favorite status and user tier.
    pub fn on_favorite_click(&self, coin: &Coin) {
        let favorite = *self.favorite.borrow();
        let tier = *self.auth_state.borrow();

        match favorite {
            FavoriteState::Favorite => {
                self.remove_dialog.send_replace(DialogState::Open);
            }
            FavoriteState::NotFavorite => match tier {
                UserState::Unauthed => {
                    let toggled = !*self.side_effect.borrow();
                    self.side_effect.send_replace(toggled);
                }
                UserState::Authed => self.check_premium_limit(coin),
                UserState::Premium => self.on_event(FavoriteEvent::Add(coin.to_favorite())),
            },
        }
    }

    /// Apply a favorite-set mutation.
    pub fn on_event(&self, event: FavoriteEvent) {
        let repository = self.repository.clone();
        let favorite = self.favorite.clone();
        let messages = self.favorite_msg.clone();
        self.scope.spawn(async move {
            match event {
                FavoriteEvent::Add(coin) => {
                    Self::add_favorite(repository, coin, favorite, messages).await;
                }
                FavoriteEvent::Remove(coin) => {
                    Self::remove_favorite(repository, coin, favorite, messages).await;
                }
            }
        });
    }

    pub fn set_remove_dialog(&self, state: DialogState) {
        self.remove_dialog.send_replace(state);
    }

    pub fn set_premium_dialog(&self, state: DialogState) {
        self.premium_dialog.send_replace(state);
    }

    /// Tear the screen down; in-flight subscriptions stop publishing.
    pub fn close(&self) {
        self.scope.cancel();
    }

    fn check_premium_limit(&self, coin: &Coin) {
        let repository = self.repository.clone();
        let favorite = self.favorite.clone();
        let messages = self.favorite_msg.clone();
        let premium_dialog = self.premium_dialog.clone();
        let limit = self.favorites_limit;
        let candidate = coin.to_favorite();
        self.scope.spawn(async move {
            let Some(profile) = repository.user_profile().next().await.flatten() else {
                return;
            };
            if profile.at_favorites_limit(limit) {
                premium_dialog.send_replace(DialogState::Open);
            } else {
                Self::add_favorite(repository, candidate, favorite, messages).await;
            }
        });
    }

    async fn add_favorite(
        repository: Arc<dyn Repository>,
        coin: FavoriteCoin,
        favorite: watch::Sender<FavoriteState>,
        messages: watch::Sender<FavoriteMessages>,
    ) {
        if let Err(err) = repository.add_favorite(coin.clone()).await {
            warn!("failed to add favorite {}: {err}", coin.id);
            return;
        }
        Self::recount_favorites(&repository).await;

        favorite.send_replace(FavoriteState::Favorite);
        messages.send_replace(FavoriteMessages {
            added: format!("{} successfully added to favorites!", coin.name),
            ..Default::default()
        });
    }

    async fn remove_favorite(
        repository: Arc<dyn Repository>,
        coin: FavoriteCoin,
        favorite: watch::Sender<FavoriteState>,
        messages: watch::Sender<FavoriteMessages>,
    ) {
        if let Err(err) = repository.remove_favorite(&coin).await {
            warn!("failed to remove favorite {}: {err}", coin.id);
            return;
        }
        Self::recount_favorites(&repository).await;

        favorite.send_replace(FavoriteState::NotFavorite);
        messages.send_replace(FavoriteMessages {
            removed: format!("{} removed from favorites!", coin.name),
            ..Default::default()
        });
    }

    /// Read the favorite set size once and write it back onto the cached
    /// profile. Not atomic with the preceding mutation; the cache serializes
    /// the writes themselves.
    async fn recount_favorites(repository: &Arc<dyn Repository>) {
        let Some(mut profile) = repository.user_profile().next().await.flatten() else {
            return;
        };
        let mut stream = repository.favorites();
        while let Some(result) = stream.next().await {
            match result {
                Resource::Loading => {}
                Resource::Success(favorites) => {
                    profile.favorite_coins_count =
                        favorites.as_ref().map(Vec::len).unwrap_or(0);
                    if let Err(err) = repository.cache_user_profile(profile).await {
                        warn!("failed to cache favorite count: {err}");
                    }
                    return;
                }
                Resource::Error(message) => {
                    warn!("favorite recount failed: {message}");
                    return;
                }
            }
        }
    }

    #[cfg(test)]
    fn force_states(&self, favorite: FavoriteState, tier: UserState) {
        self.favorite.send_replace(favorite);
        self.auth_state.send_replace(tier);
    }
}
