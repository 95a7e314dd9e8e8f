//! Wire payloads and their conversion to internal state types.

use crate::state::{ChartPoint, Coin, NewsItem, Session};
use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

/// `GET /coins/{id}` response wrapper.
#[derive(Debug, Deserialize)]
pub struct CoinEnvelopeDto {
    pub coin: CoinDto,
}

/// A coin as the market-data API serializes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinDto {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_change_1h: f64,
    #[serde(default)]
    pub price_change_1d: f64,
    #[serde(default)]
    pub price_change_1w: f64,
    #[serde(default)]
    pub market_cap: f64,
    #[serde(default)]
    pub icon: Option<String>,
}

/// `GET /charts` response wrapper; each sample is `[timestamp, price, ...]`.
#[derive(Debug, Deserialize)]
pub struct ChartEnvelopeDto {
    pub chart: Vec<Vec<f64>>,
}

/// `GET /news/{filter}` response wrapper.
#[derive(Debug, Deserialize)]
pub struct NewsEnvelopeDto {
    pub news: Vec<NewsItemDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItemDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, rename = "imgURL")]
    pub img_url: Option<String>,
    /// Publication time in epoch milliseconds.
    #[serde(default)]
    pub feed_date: Option<i64>,
}

/// Auth endpoint response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub user_id: String,
    pub email: String,
    pub token: String,
}

/// Converts API responses to internal state types.
pub struct DataConverter;

impl DataConverter {
    /// Convert a wire coin to our internal Coin type.
    pub fn convert_coin(dto: CoinDto) -> Coin {
        Coin {
            id: dto.id,
            name: dto.name,
            symbol: dto.symbol,
            rank: dto.rank,
            price: Self::decimal(dto.price),
            price_change_1h: Self::decimal(dto.price_change_1h),
            price_change_1d: Self::decimal(dto.price_change_1d),
            price_change_1w: Self::decimal(dto.price_change_1w),
            market_cap: Self::decimal(dto.market_cap),
            icon: dto.icon,
        }
    }

    /// Convert raw chart samples, skipping malformed rows.
    pub fn convert_chart(dto: ChartEnvelopeDto) -> Vec<ChartPoint> {
        dto.chart
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [timestamp, price, ..] => Some(ChartPoint::new(*timestamp, *price)),
                _ => None,
            })
            .collect()
    }

    /// Convert a wire news item to our internal NewsItem type.
    pub fn convert_news_item(dto: NewsItemDto) -> NewsItem {
        NewsItem {
            id: dto.id,
            title: dto.title,
            source: dto.source,
            url: dto.link,
            image_url: dto.img_url,
            published_at: dto.feed_date.and_then(DateTime::from_timestamp_millis),
        }
    }

    /// Convert an auth response to a session.
    pub fn convert_session(dto: SessionDto) -> Session {
        Session {
            user_id: dto.user_id,
            email: dto.email,
            token: dto.token,
        }
    }

    fn decimal(value: f64) -> Decimal {
        Decimal::from_f64_retain(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_coin_maps_fields() {
        let dto: CoinEnvelopeDto = serde_json::from_str(
            r#"{"coin":{"id":"bitcoin","name":"Bitcoin","symbol":"BTC","rank":1,
                "price":64000.5,"priceChange1d":-2.4,"marketCap":1.2e12}}"#,
        )
        .unwrap();
        let coin = DataConverter::convert_coin(dto.coin);
        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.rank, 1);
        assert_eq!(coin.price, dec!(64000.5));
        assert_eq!(coin.price_change_1d, dec!(-2.4));
        assert_eq!(coin.price_change_1h, dec!(0));
    }

    #[test]
    fn test_convert_chart_skips_short_rows() {
        let dto = ChartEnvelopeDto {
            chart: vec![vec![1.0, 10.0, 99.0], vec![2.0], vec![3.0, 30.0]],
        };
        let points = DataConverter::convert_chart(dto);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], ChartPoint::new(1.0, 10.0));
        assert_eq!(points[1], ChartPoint::new(3.0, 30.0));
    }

    #[test]
    fn test_convert_news_item_parses_feed_date() {
        let dto: NewsEnvelopeDto = serde_json::from_str(
            r#"{"news":[{"id":"n1","title":"Up only","source":"wire",
                "link":"https://example.com/n1","imgURL":null,"feedDate":1700000000000}]}"#,
        )
        .unwrap();
        let item = DataConverter::convert_news_item(dto.news.into_iter().next().unwrap());
        assert_eq!(item.url, "https://example.com/n1");
        assert!(item.published_at.is_some());
    }
}
