//! State management for Coinwatch.
//!
//! Screen state lives in plain snapshot records published through
//! single-writer `watch` cells; repository results arrive as [`Resource`] or
//! [`Response`] envelopes which the screen controllers fold into fresh
//! snapshots.

mod auth_state;
mod coin_state;
mod news_state;
mod resource;
mod user_state;

pub use auth_state::{
    Credential, ResetPasswordState, Session, SignInScreenState, SignInState, SignUpState,
};
pub use coin_state::{ChartPoint, ChartState, Coin, CoinState, TimeRange};
pub use news_state::{NewsFilter, NewsItem, NewsState};
pub use resource::{DEFAULT_ERROR_MESSAGE, Resource, Response};
pub use user_state::{
    DialogState, FavoriteCoin, FavoriteMessages, FavoriteState, UserProfile, UserState,
};
