//! REST-backed repository implementation.

use super::cache::CacheStore;
use super::convert::{
    ChartEnvelopeDto, CoinEnvelopeDto, DataConverter, NewsEnvelopeDto, SessionDto,
};
use super::fetch_stream;
use crate::config::{ApiConfig, AuthConfig, Config};
use crate::error::Result;
use crate::state::{
    ChartPoint, Coin, FavoriteCoin, FavoriteState, NewsFilter, NewsItem, Resource, Session,
    TimeRange, UserProfile, UserState,
};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::warn;

/// Builder for creating a REST repository.
pub struct RestRepositoryBuilder {
    config: Config,
    cache: Option<CacheStore>,
}

impl RestRepositoryBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            cache: None,
        }
    }

    /// Set the configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use a specific cache store instead of the default file-backed one.
    pub fn cache(mut self, cache: CacheStore) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the repository.
    pub fn build(self) -> Result<RestRepository> {
        let cache = match self.cache {
            Some(cache) => cache,
            None => match crate::config::data_dir() {
                Ok(dir) => CacheStore::open(dir.join("cache.json"))?,
                Err(err) => {
                    warn!("no data directory, cache will not persist: {err}");
                    CacheStore::in_memory()
                }
            },
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.api.timeout_secs))
            .build()?;
        let rate_limiter = RateLimiter::new(self.config.api.rate_limit);

        Ok(RestRepository {
            http,
            api: self.config.api,
            auth: self.config.auth,
            cache: Arc::new(cache),
            rate_limiter: Arc::new(RwLock::new(rate_limiter)),
        })
    }
}

impl Default for RestRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Repository over the market-data REST API plus the local cache.
pub struct RestRepository {
    http: reqwest::Client,
    api: ApiConfig,
    auth: AuthConfig,
    cache: Arc<CacheStore>,
    rate_limiter: Arc<RwLock<RateLimiter>>,
}

impl RestRepository {
    /// Builder entry point.
    pub fn builder() -> RestRepositoryBuilder {
        RestRepositoryBuilder::new()
    }

    /// The cache shared with this repository.
    pub fn cache(&self) -> Arc<CacheStore> {
        self.cache.clone()
    }

    async fn get_json<T: DeserializeOwned>(
        http: reqwest::Client,
        limiter: Arc<RwLock<RateLimiter>>,
        url: String,
    ) -> Result<T> {
        limiter.write().await.acquire().await;
        let response = http.get(&url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    async fn post_json<T: DeserializeOwned>(
        http: reqwest::Client,
        limiter: Arc<RwLock<RateLimiter>>,
        url: String,
        body: serde_json::Value,
    ) -> Result<T> {
        limiter.write().await.acquire().await;
        let response = http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    fn session_stream(&self, url: String, email: &str, password: &str) -> BoxStream<'static, Resource<Session>> {
        let http = self.http.clone();
        let limiter = self.rate_limiter.clone();
        let body = json!({ "email": email, "password": password });
        fetch_stream(async move {
            let dto: SessionDto = Self::post_json(http, limiter, url, body).await?;
            Ok(DataConverter::convert_session(dto))
        })
    }
}

#[async_trait]
impl super::Repository for RestRepository {
    fn sign_in(&self, email: &str, password: &str) -> BoxStream<'static, Resource<Session>> {
        let url = format!("{}/accounts/sign_in", self.auth.base_url);
        self.session_stream(url, email, password)
    }

    fn sign_up(&self, email: &str, password: &str) -> BoxStream<'static, Resource<Session>> {
        let url = format!("{}/accounts/sign_up", self.auth.base_url);
        self.session_stream(url, email, password)
    }

    fn reset_password(&self, email: &str) -> BoxStream<'static, Resource<bool>> {
        let http = self.http.clone();
        let limiter = self.rate_limiter.clone();
        let url = format!("{}/accounts/reset_password", self.auth.base_url);
        let body = json!({ "email": email });
        fetch_stream(async move {
            limiter.write().await.acquire().await;
            http.post(&url).json(&body).send().await?.error_for_status()?;
            Ok(true)
        })
    }

    fn coin_by_id(&self, id: &str) -> BoxStream<'static, Resource<Coin>> {
        let http = self.http.clone();
        let limiter = self.rate_limiter.clone();
        let url = format!(
            "{}/coins/{}?currency={}",
            self.api.base_url, id, self.api.currency
        );
        fetch_stream(async move {
            let envelope: CoinEnvelopeDto = Self::get_json(http, limiter, url).await?;
            Ok(DataConverter::convert_coin(envelope.coin))
        })
    }

    fn chart(&self, id: &str, range: TimeRange) -> BoxStream<'static, Resource<Vec<ChartPoint>>> {
        let http = self.http.clone();
        let limiter = self.rate_limiter.clone();
        let url = format!(
            "{}/charts?period={}&coinId={}",
            self.api.base_url,
            range.as_period(),
            id
        );
        fetch_stream(async move {
            let envelope: ChartEnvelopeDto = Self::get_json(http, limiter, url).await?;
            Ok(DataConverter::convert_chart(envelope))
        })
    }

    fn news(&self, filter: NewsFilter) -> BoxStream<'static, Resource<Vec<NewsItem>>> {
        let http = self.http.clone();
        let limiter = self.rate_limiter.clone();
        let url = format!("{}/news/{}?limit=50", self.api.base_url, filter.as_path());
        fetch_stream(async move {
            let envelope: NewsEnvelopeDto = Self::get_json(http, limiter, url).await?;
            Ok(envelope
                .news
                .into_iter()
                .map(DataConverter::convert_news_item)
                .collect())
        })
    }

    fn favorites(&self) -> BoxStream<'static, Resource<Vec<FavoriteCoin>>> {
        let cache = self.cache.clone();
        fetch_stream(async move { Ok(cache.favorites().await) })
    }

    async fn add_favorite(&self, coin: FavoriteCoin) -> Result<()> {
        self.cache.add_favorite(coin).await
    }

    async fn remove_favorite(&self, coin: &FavoriteCoin) -> Result<()> {
        self.cache.remove_favorite(&coin.id).await
    }

    async fn is_favorite(&self, coin: &FavoriteCoin) -> FavoriteState {
        self.cache.favorite_state(&coin.id).await
    }

    fn user_profile(&self) -> BoxStream<'static, Option<UserProfile>> {
        let cache = self.cache.clone();
        stream::once(async move { cache.profile().await }).boxed()
    }

    async fn cache_user_profile(&self, profile: UserProfile) -> Result<()> {
        self.cache.set_profile(profile).await
    }

    async fn save_user_exists(&self, exists: bool) -> Result<()> {
        self.cache.set_user_exists(exists).await
    }

    async fn refresh_cached_user(&self) -> Result<()> {
        if self.cache.profile().await.is_none() {
            self.cache.set_profile(UserProfile::default()).await?;
        }
        self.cache.refresh_profile_count().await
    }

    fn user_state(&self) -> BoxStream<'static, UserState> {
        let cache = self.cache.clone();
        stream::once(async move { cache.user_state().await }).boxed()
    }
}

/// Token-bucket rate limiter for outbound API calls.
struct RateLimiter {
    per_second: u32,
    tokens: f64,
    last_refill: std::time::Instant,
}

impl RateLimiter {
    fn new(per_second: u32) -> Self {
        Self {
            per_second: per_second.max(1),
            tokens: per_second.max(1) as f64,
            last_refill: std::time::Instant::now(),
        }
    }

    async fn acquire(&mut self) {
        let now = std::time::Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens =
            (self.tokens + elapsed * self.per_second as f64).min(self.per_second as f64);
        self.last_refill = now;

        if self.tokens < 1.0 {
            let wait = (1.0 - self.tokens) / self.per_second as f64;
            tokio::time::sleep(Duration::from_secs_f64(wait)).await;
            self.tokens = 1.0;
            self.last_refill = std::time::Instant::now();
        }

        self.tokens -= 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn repository() -> RestRepository {
        RestRepository::builder()
            .cache(CacheStore::in_memory())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_favorites_stream_is_enveloped() {
        let repo = repository();
        repo.add_favorite(FavoriteCoin {
            id: "bitcoin".into(),
            name: "Bitcoin".into(),
            rank: 1,
            price_changed_1d: dec!(1.5),
        })
        .await
        .unwrap();

        let emissions: Vec<_> = repo.favorites().collect().await;
        assert_eq!(emissions.len(), 2);
        assert!(emissions[0].is_loading());
        match &emissions[1] {
            Resource::Success(Some(coins)) => assert_eq!(coins.len(), 1),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_user_state_follows_cache() {
        let repo = repository();
        let state = repo.user_state().next().await;
        assert_eq!(state, Some(UserState::Unauthed));

        repo.save_user_exists(true).await.unwrap();
        let state = repo.user_state().next().await;
        assert_eq!(state, Some(UserState::Authed));
    }

    #[tokio::test]
    async fn test_refresh_cached_user_creates_profile_and_counts() {
        let repo = repository();
        repo.add_favorite(FavoriteCoin {
            id: "solana".into(),
            ..Default::default()
        })
        .await
        .unwrap();
        repo.refresh_cached_user().await.unwrap();

        let profile = repo.user_profile().next().await.flatten().unwrap();
        assert_eq!(profile.favorite_coins_count, 1);
    }

    #[tokio::test]
    async fn test_rate_limiter_permits_burst_up_to_capacity() {
        let mut limiter = RateLimiter::new(10);
        let start = std::time::Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(200));
    }
}
