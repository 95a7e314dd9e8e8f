//! News feed state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Article id.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Publishing outlet.
    pub source: String,
    /// Canonical link.
    pub url: String,
    /// Cover image, if any.
    pub image_url: Option<String>,
    /// Publication time.
    pub published_at: Option<DateTime<Utc>>,
}

/// Feed selection understood by the news endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NewsFilter {
    #[default]
    Trending,
    Latest,
    Bullish,
    Bearish,
}

impl NewsFilter {
    /// Path segment for the news endpoint.
    pub fn as_path(&self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Latest => "latest",
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
        }
    }
}

/// Snapshot rendered by the news screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsState {
    /// Whether the initial fetch is in flight.
    pub is_loading: bool,
    /// The loaded articles.
    pub news: Vec<NewsItem>,
    /// Error message; empty means no error.
    pub error: String,
}

impl NewsState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    pub fn loaded(news: Vec<NewsItem>) -> Self {
        Self {
            news,
            ..Default::default()
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            ..Default::default()
        }
    }
}
