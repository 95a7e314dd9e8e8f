//! Repository boundary.
//!
//! Screen controllers and the worker consume these traits; the concrete
//! [`RestRepository`] combines the remote market-data API with a local cache.
//! Remote calls surface as cold streams of [`Resource`] envelopes: one
//! `Loading` emission followed by `Success` or `Error`.

mod cache;
mod convert;
mod remote;

pub use cache::CacheStore;
pub use remote::{RestRepository, RestRepositoryBuilder};

use crate::error::Result;
use crate::state::{
    ChartPoint, Coin, Credential, FavoriteCoin, FavoriteState, NewsFilter, NewsItem, Resource,
    Response, Session, TimeRange, UserProfile, UserState,
};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use tracing::warn;

/// Data layer consumed by the screen controllers and the alert worker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    /// Authenticate with email and password.
    fn sign_in(&self, email: &str, password: &str) -> BoxStream<'static, Resource<Session>>;

    /// Register a new account.
    fn sign_up(&self, email: &str, password: &str) -> BoxStream<'static, Resource<Session>>;

    /// Request a password-reset email.
    fn reset_password(&self, email: &str) -> BoxStream<'static, Resource<bool>>;

    /// Fetch a single coin.
    fn coin_by_id(&self, id: &str) -> BoxStream<'static, Resource<Coin>>;

    /// Fetch chart samples for a coin over the given window.
    fn chart(&self, id: &str, range: TimeRange) -> BoxStream<'static, Resource<Vec<ChartPoint>>>;

    /// Fetch the news feed.
    fn news(&self, filter: NewsFilter) -> BoxStream<'static, Resource<Vec<NewsItem>>>;

    /// The user's favorite coins.
    fn favorites(&self) -> BoxStream<'static, Resource<Vec<FavoriteCoin>>>;

    /// Add a coin to the favorite set.
    async fn add_favorite(&self, coin: FavoriteCoin) -> Result<()>;

    /// Remove a coin from the favorite set.
    async fn remove_favorite(&self, coin: &FavoriteCoin) -> Result<()>;

    /// Whether the coin is currently in the favorite set.
    async fn is_favorite(&self, coin: &FavoriteCoin) -> FavoriteState;

    /// The cached user profile, if one exists.
    fn user_profile(&self) -> BoxStream<'static, Option<UserProfile>>;

    /// Replace the cached user profile.
    async fn cache_user_profile(&self, profile: UserProfile) -> Result<()>;

    /// Persist the user-exists flag.
    async fn save_user_exists(&self, exists: bool) -> Result<()>;

    /// Rebuild the cached profile from current local state.
    async fn refresh_cached_user(&self) -> Result<()>;

    /// Resolve the current user tier.
    fn user_state(&self) -> BoxStream<'static, UserState>;
}

/// Federated-identity capability, independent of [`Repository`].
#[cfg_attr(test, mockall::automock)]
pub trait IdentityService: Send + Sync {
    /// Start the one-tap flow and surface the provider credential.
    fn one_tap_sign_in(&self) -> BoxStream<'static, Response<Option<Credential>>>;

    /// Exchange a provider credential for a signed-in session.
    fn sign_in_with_credential(&self, credential: Credential)
    -> BoxStream<'static, Response<bool>>;
}

/// Identity service for builds without a federation backend.
///
/// Emits a failure so callers fold the flow like any other failed call.
#[derive(Debug, Default)]
pub struct DisabledIdentityService;

impl IdentityService for DisabledIdentityService {
    fn one_tap_sign_in(&self) -> BoxStream<'static, Response<Option<Credential>>> {
        stream::iter([
            Response::Loading,
            Response::failure(crate::Error::auth("identity federation is not configured")),
        ])
        .boxed()
    }

    fn sign_in_with_credential(
        &self,
        _credential: Credential,
    ) -> BoxStream<'static, Response<bool>> {
        stream::iter([
            Response::Loading,
            Response::failure(crate::Error::auth("identity federation is not configured")),
        ])
        .boxed()
    }
}

/// Wrap a fallible fetch into the Loading → Success/Error envelope stream.
pub(crate) fn fetch_stream<T, Fut>(fut: Fut) -> BoxStream<'static, Resource<T>>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    stream::once(async { Resource::Loading })
        .chain(stream::once(async move {
            match fut.await {
                Ok(value) => Resource::success(value),
                Err(err) => {
                    warn!("repository call failed: {err}");
                    Resource::error(err.to_string())
                }
            }
        }))
        .boxed()
}
