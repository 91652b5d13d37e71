//! User-facing polling and notification settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::credential::Credential;

const DEFAULT_POST_INTERVAL_MINUTES: u64 = 5;
const DEFAULT_COMMENT_INTERVAL_MINUTES: u64 = 10;
const DEFAULT_COMMENT_TIME_RANGE_HOURS: u64 = 24;

/// The two independently scheduled sync cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    /// Pulls the latest posts of every tracked entity.
    Posts,
    /// Pulls comment threads of recent cached posts.
    Comments,
}

impl std::fmt::Display for CycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Posts => write!(f, "post-sync"),
            Self::Comments => write!(f, "comment-sync"),
        }
    }
}

/// Webhook push target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSettings {
    /// Endpoint receiving the JSON payload.
    pub url: String,
    /// Keyword the receiving bot filters on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Notification channel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Show desktop notifications.
    #[serde(default = "default_true")]
    pub local_enabled: bool,
    /// Push notifications to a webhook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookSettings>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            local_enabled: true,
            webhook: None,
        }
    }
}

impl NotificationSettings {
    /// Returns the webhook target if one is usable.
    #[must_use]
    pub fn webhook_target(&self) -> Option<&WebhookSettings> {
        self.webhook.as_ref().filter(|w| !w.url.trim().is_empty())
    }
}

/// Polling and notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Upstream session credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,

    /// Run the post-sync timer.
    #[serde(default = "default_true")]
    pub enable_post_polling: bool,

    /// Minutes between post-sync ticks.
    #[serde(default = "default_post_interval")]
    pub post_polling_interval_minutes: u64,

    /// Run the comment-sync timer.
    #[serde(default = "default_true")]
    pub enable_comment_polling: bool,

    /// Minutes between comment-sync ticks.
    #[serde(default = "default_comment_interval")]
    pub comment_polling_interval_minutes: u64,

    /// Only posts younger than this many hours get their comments polled.
    #[serde(default = "default_comment_time_range")]
    pub comment_time_range_hours: u64,

    /// Notification channels.
    #[serde(default)]
    pub notifications: NotificationSettings,
}

fn default_true() -> bool {
    true
}

fn default_post_interval() -> u64 {
    DEFAULT_POST_INTERVAL_MINUTES
}

fn default_comment_interval() -> u64 {
    DEFAULT_COMMENT_INTERVAL_MINUTES
}

fn default_comment_time_range() -> u64 {
    DEFAULT_COMMENT_TIME_RANGE_HOURS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credential: None,
            enable_post_polling: true,
            post_polling_interval_minutes: DEFAULT_POST_INTERVAL_MINUTES,
            enable_comment_polling: true,
            comment_polling_interval_minutes: DEFAULT_COMMENT_INTERVAL_MINUTES,
            comment_time_range_hours: DEFAULT_COMMENT_TIME_RANGE_HOURS,
            notifications: NotificationSettings::default(),
        }
    }
}

impl Settings {
    /// Sets the credential.
    #[must_use]
    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    /// Interval of a cycle's timer, `None` when that timer is disabled.
    #[must_use]
    pub fn cycle_period(&self, cycle: CycleKind) -> Option<Duration> {
        let (enabled, minutes) = match cycle {
            CycleKind::Posts => (self.enable_post_polling, self.post_polling_interval_minutes),
            CycleKind::Comments => (
                self.enable_comment_polling,
                self.comment_polling_interval_minutes,
            ),
        };

        (enabled && minutes > 0).then(|| Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// Comment recency window in seconds.
    #[must_use]
    pub fn comment_window_secs(&self) -> i64 {
        i64::try_from(self.comment_time_range_hours.saturating_mul(3600)).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(true, 5, Some(300) ; "enabled")]
    #[test_case(false, 5, None ; "disabled")]
    #[test_case(true, 0, None ; "zero_interval")]
    fn test_post_cycle_period(enabled: bool, minutes: u64, expected_secs: Option<u64>) {
        let settings = Settings {
            enable_post_polling: enabled,
            post_polling_interval_minutes: minutes,
            ..Settings::default()
        };

        assert_eq!(
            settings.cycle_period(CycleKind::Posts),
            expected_secs.map(Duration::from_secs)
        );
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"commentTimeRangeHours": 2, "enablePostPolling": false}"#)
                .unwrap();

        assert!(!settings.enable_post_polling);
        assert_eq!(settings.comment_time_range_hours, 2);
        assert_eq!(settings.comment_window_secs(), 7200);
        assert_eq!(settings.post_polling_interval_minutes, 5);
        assert!(settings.notifications.local_enabled);
        assert!(settings.credential.is_none());
    }

    #[test]
    fn test_blank_webhook_url_is_not_a_target() {
        let notifications = NotificationSettings {
            local_enabled: true,
            webhook: Some(WebhookSettings {
                url: "  ".to_string(),
                keyword: None,
            }),
        };
        assert!(notifications.webhook_target().is_none());
    }
}
