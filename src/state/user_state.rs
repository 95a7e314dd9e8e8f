//! User tier, profile and favorite-related state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// User classification gating feature limits and notification detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserState {
    /// No account signed in.
    #[default]
    Unauthed,
    /// Signed-in account on the free plan.
    Authed,
    /// Signed-in account on the premium plan.
    Premium,
}

impl std::fmt::Display for UserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthed => write!(f, "guest"),
            Self::Authed => write!(f, "member"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

/// The cached user profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account email.
    pub email: String,
    /// Cached size of the favorite set.
    pub favorite_coins_count: usize,
    /// Whether the account is on the premium plan.
    pub premium: bool,
}

impl UserProfile {
    /// Whether adding another favorite would exceed the free-plan limit.
    pub fn at_favorites_limit(&self, limit: usize) -> bool {
        !self.premium && self.favorite_coins_count >= limit
    }
}

/// A coin the user marked as favorite. Identity is the coin id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCoin {
    /// Coin id (e.g. "bitcoin").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Market-cap rank.
    pub rank: u32,
    /// Last observed 1-day price change, in percent.
    pub price_changed_1d: Decimal,
}

/// Whether the currently viewed coin is in the favorite set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteState {
    #[default]
    NotFavorite,
    Favorite,
}

/// Transient toast text published after a favorite mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteMessages {
    /// Set after a successful add.
    pub added: String,
    /// Set after a successful remove.
    pub removed: String,
}

/// A yes/no prompt gated by business rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    Open,
    #[default]
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorites_limit_applies_to_free_plan_only() {
        let mut profile = UserProfile {
            favorite_coins_count: 3,
            ..Default::default()
        };
        assert!(profile.at_favorites_limit(3));
        assert!(!profile.at_favorites_limit(4));

        profile.premium = true;
        assert!(!profile.at_favorites_limit(3));
    }
}
