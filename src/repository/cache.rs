//! Local cache behind the repository.
//!
//! Holds the user-exists flag, the cached profile, and the favorite set,
//! persisted as one JSON file under the data directory. All mutation goes
//! through a single async mutex, so writers are serialized; the recount that
//! follows a favorite mutation is still a separate step (see the controller).

use crate::error::Result;
use crate::state::{FavoriteCoin, FavoriteState, UserProfile, UserState};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
struct CacheData {
    user_exists: bool,
    profile: Option<UserProfile>,
    favorites: Vec<FavoriteCoin>,
}

/// File-backed cache for profile and favorite state.
#[derive(Debug)]
pub struct CacheStore {
    path: Option<PathBuf>,
    data: Mutex<CacheData>,
}

impl CacheStore {
    /// In-memory store, nothing persisted.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(CacheData::default()),
        }
    }

    /// Store backed by the given JSON file; loads existing content if present.
    pub fn open(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            CacheData::default()
        };
        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    pub async fn user_exists(&self) -> bool {
        self.data.lock().await.user_exists
    }

    pub async fn set_user_exists(&self, exists: bool) -> Result<()> {
        let mut data = self.data.lock().await;
        data.user_exists = exists;
        self.persist(&data)
    }

    pub async fn profile(&self) -> Option<UserProfile> {
        self.data.lock().await.profile.clone()
    }

    pub async fn set_profile(&self, profile: UserProfile) -> Result<()> {
        let mut data = self.data.lock().await;
        data.profile = Some(profile);
        self.persist(&data)
    }

    pub async fn favorites(&self) -> Vec<FavoriteCoin> {
        self.data.lock().await.favorites.clone()
    }

    /// Insert a favorite; replaces an existing entry with the same id.
    pub async fn add_favorite(&self, coin: FavoriteCoin) -> Result<()> {
        let mut data = self.data.lock().await;
        data.favorites.retain(|c| c.id != coin.id);
        data.favorites.push(coin);
        self.persist(&data)
    }

    pub async fn remove_favorite(&self, id: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        data.favorites.retain(|c| c.id != id);
        self.persist(&data)
    }

    pub async fn favorite_state(&self, id: &str) -> FavoriteState {
        if self.data.lock().await.favorites.iter().any(|c| c.id == id) {
            FavoriteState::Favorite
        } else {
            FavoriteState::NotFavorite
        }
    }

    /// Recount the favorite set onto the cached profile, if one exists.
    pub async fn refresh_profile_count(&self) -> Result<()> {
        let mut data = self.data.lock().await;
        let count = data.favorites.len();
        if let Some(profile) = data.profile.as_mut() {
            profile.favorite_coins_count = count;
        }
        self.persist(&data)
    }

    /// Derive the user tier from cached state.
    pub async fn user_state(&self) -> UserState {
        let data = self.data.lock().await;
        match (data.user_exists, &data.profile) {
            (false, _) => UserState::Unauthed,
            (true, Some(profile)) if profile.premium => UserState::Premium,
            (true, _) => UserState::Authed,
        }
    }

    fn persist(&self, data: &CacheData) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        if let Err(err) = std::fs::write(path, content) {
            warn!("failed to persist cache: {err}");
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn favorite(id: &str) -> FavoriteCoin {
        FavoriteCoin {
            id: id.into(),
            name: id.into(),
            rank: 1,
            price_changed_1d: dec!(0),
        }
    }

    #[tokio::test]
    async fn test_add_is_idempotent_per_id() {
        let store = CacheStore::in_memory();
        store.add_favorite(favorite("bitcoin")).await.unwrap();
        store.add_favorite(favorite("bitcoin")).await.unwrap();
        assert_eq!(store.favorites().await.len(), 1);
        assert_eq!(
            store.favorite_state("bitcoin").await,
            FavoriteState::Favorite
        );
    }

    #[tokio::test]
    async fn test_remove_clears_membership() {
        let store = CacheStore::in_memory();
        store.add_favorite(favorite("solana")).await.unwrap();
        store.remove_favorite("solana").await.unwrap();
        assert_eq!(
            store.favorite_state("solana").await,
            FavoriteState::NotFavorite
        );
    }

    #[tokio::test]
    async fn test_refresh_profile_count_tracks_set_size() {
        let store = CacheStore::in_memory();
        store.set_profile(UserProfile::default()).await.unwrap();
        store.add_favorite(favorite("bitcoin")).await.unwrap();
        store.add_favorite(favorite("solana")).await.unwrap();
        store.refresh_profile_count().await.unwrap();
        assert_eq!(store.profile().await.unwrap().favorite_coins_count, 2);
    }

    #[tokio::test]
    async fn test_tier_derivation() {
        let store = CacheStore::in_memory();
        assert_eq!(store.user_state().await, UserState::Unauthed);

        store.set_user_exists(true).await.unwrap();
        assert_eq!(store.user_state().await, UserState::Authed);

        store
            .set_profile(UserProfile {
                premium: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(store.user_state().await, UserState::Premium);
    }

    #[tokio::test]
    async fn test_open_round_trips_through_disk() {
        let dir = std::env::temp_dir().join("coinwatch-cache-test");
        let path = dir.join("cache.json");
        let _ = std::fs::remove_file(&path);

        let store = CacheStore::open(path.clone()).unwrap();
        store.set_user_exists(true).await.unwrap();
        store.add_favorite(favorite("bitcoin")).await.unwrap();
        drop(store);

        let reopened = CacheStore::open(path.clone()).unwrap();
        assert!(reopened.user_exists().await);
        assert_eq!(reopened.favorites().await.len(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
