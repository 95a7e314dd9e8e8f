//! Notification boundary.
//!
//! The delivery transport (system tray, push, etc.) lives behind the
//! [`Notifier`] trait; the crate ships a tracing-backed implementation so the
//! daemon is observable without a platform integration.

use crate::state::UserState;
use tracing::info;

/// Description used when a favorite coin crosses the threshold upward.
pub const DESCRIPTION_MARKET_CHANGE_POSITIVE: &str = "is significantly up today, check it out!";

/// Description used when a favorite coin crosses the threshold downward.
pub const DESCRIPTION_MARKET_CHANGE_NEGATIVE: &str = "is significantly down today, check it out!";

/// Receiver of price-alert notifications.
///
/// `tier` selects the detail level the transport renders; ids key
/// notifications so alerts for different coins never collide.
pub trait Notifier: Send + Sync {
    /// Show a per-coin notification.
    fn show(&self, title: &str, description: &str, id: u32, tier: UserState);

    /// Show the generic market-up notification.
    fn show_positive(&self, tier: UserState);

    /// Show the generic market-down notification.
    fn show_negative(&self, tier: UserState);
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Positive,
    Negative,
}

/// A rendered notification payload.
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn positive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NotificationLevel::Positive,
        }
    }

    pub fn negative(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NotificationLevel::Negative,
        }
    }
}

/// Notifier that renders through the tracing pipeline.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, title: &str, description: &str, id: u32, tier: UserState) {
        info!(id, %tier, "{} {}", title, description);
    }

    fn show_positive(&self, tier: UserState) {
        let n = Notification::positive("Market update", "the market is moving up today");
        info!(%tier, "{}: {}", n.title, n.description);
    }

    fn show_negative(&self, tier: UserState) {
        let n = Notification::negative("Market update", "the market is moving down today");
        info!(%tier, "{}: {}", n.title, n.description);
    }
}
