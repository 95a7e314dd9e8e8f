//! Coin and chart state for the detail screen.

use super::FavoriteCoin;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A coin as returned by the market-data API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Coin id (e.g. "bitcoin").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ticker symbol (e.g. "BTC").
    pub symbol: String,
    /// Market-cap rank.
    pub rank: u32,
    /// Current price in the quote currency.
    pub price: Decimal,
    /// 1-hour price change, in percent.
    pub price_change_1h: Decimal,
    /// 1-day price change, in percent.
    pub price_change_1d: Decimal,
    /// 1-week price change, in percent.
    pub price_change_1w: Decimal,
    /// Market capitalization.
    pub market_cap: Decimal,
    /// Icon URL.
    pub icon: Option<String>,
}

impl Coin {
    /// Project this coin onto its favorite-set representation.
    pub fn to_favorite(&self) -> FavoriteCoin {
        FavoriteCoin {
            id: self.id.clone(),
            name: self.name.clone(),
            rank: self.rank,
            price_changed_1d: self.price_change_1d,
        }
    }
}

/// One sample of a price chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Unix timestamp of the sample.
    pub timestamp: f64,
    /// Price at that instant.
    pub price: f64,
}

impl ChartPoint {
    pub fn new(timestamp: f64, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Chart window selectable on the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    OneDay,
    OneWeek,
    OneMonth,
    OneYear,
    All,
}

impl TimeRange {
    /// Period string understood by the charts endpoint.
    pub fn as_period(&self) -> &'static str {
        match self {
            Self::OneDay => "24h",
            Self::OneWeek => "1w",
            Self::OneMonth => "1m",
            Self::OneYear => "1y",
            Self::All => "all",
        }
    }
}

/// Snapshot rendered by the coin pane of the detail screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoinState {
    /// Whether the coin fetch is in flight.
    pub is_loading: bool,
    /// The loaded coin, if any.
    pub coin: Option<Coin>,
    /// Error message; empty means no error.
    pub error: String,
}

impl CoinState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    pub fn loaded(coin: Coin) -> Self {
        Self {
            coin: Some(coin),
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

/// Snapshot rendered by the chart pane of the detail screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartState {
    /// Whether the chart fetch is in flight.
    pub is_loading: bool,
    /// Chart samples, oldest first.
    pub points: Vec<ChartPoint>,
    /// Error message; empty means no error.
    pub error: String,
}

impl ChartState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    pub fn loaded(points: Vec<ChartPoint>) -> Self {
        Self {
            points,
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
