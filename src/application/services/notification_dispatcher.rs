//! Formats and emits notifications for detected deltas.

use std::sync::Arc;

use chrono::DateTime;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::entities::{NotificationSettings, WebhookSettings};
use crate::domain::ports::{NotificationPort, WebhookPayload, WebhookPort};
use crate::domain::{Delta, DeltaKind};

const APP_TITLE: &str = "Postwatch";
const LOCAL_POST_BODY_CHARS: usize = 120;
const WEBHOOK_CONTENT_CHARS: usize = 200;

/// Sends deltas to the desktop and webhook channels.
///
/// Keeps no ledger of what was sent; callers only pass genuinely new items.
#[derive(Clone)]
pub struct NotificationDispatcher {
    local: Arc<dyn NotificationPort>,
    webhook: Arc<dyn WebhookPort>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over both channels.
    #[must_use]
    pub fn new(local: Arc<dyn NotificationPort>, webhook: Arc<dyn WebhookPort>) -> Self {
        Self { local, webhook }
    }

    /// Emits `delta` on every enabled channel.
    ///
    /// The webhook post runs on its own task and logs its own failure; the
    /// returned handle belongs to that task. Must be called within a tokio
    /// runtime when a webhook is configured.
    pub fn notify(&self, settings: &NotificationSettings, delta: &Delta) -> Option<JoinHandle<()>> {
        if settings.local_enabled {
            if self.local.is_permitted() {
                let (title, body) = local_message(delta);
                self.local.send(&title, &body);
            } else {
                debug!("Desktop notifications not permitted, skipping");
            }
        }

        let target = settings.webhook_target()?;
        let payload = webhook_payload(delta, target);
        let url = target.url.clone();
        let item_id = delta.item_id.clone();
        let webhook = Arc::clone(&self.webhook);

        Some(tokio::spawn(async move {
            match webhook.post(&url, &payload).await {
                Ok(()) => debug!(%item_id, "Webhook delivered"),
                Err(e) => warn!(error = %e, %item_id, "Webhook delivery failed"),
            }
        }))
    }
}

fn local_message(delta: &Delta) -> (String, String) {
    let title = format!("{APP_TITLE}: {} · {}", delta.entity_name, delta.kind);
    let body = match delta.kind {
        DeltaKind::NewPost => truncate(&delta.content, LOCAL_POST_BODY_CHARS),
        DeltaKind::NewComment | DeltaKind::NewReply => delta.content.clone(),
    };
    (title, body)
}

/// Builds the markdown webhook message for `delta`.
#[must_use]
pub fn webhook_payload(delta: &Delta, target: &WebhookSettings) -> WebhookPayload {
    let keyword = target
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    let headline = format!("{} · {}", delta.entity_name, delta.kind);
    let title = match keyword {
        Some(keyword) => format!("[{keyword}] {headline}"),
        None => headline.clone(),
    };

    let time = DateTime::from_timestamp(delta.timestamp, 0).map_or_else(
        || delta.timestamp.to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    let content = truncate(&delta.content, WEBHOOK_CONTENT_CHARS).replace('\n', " ");

    let mut text = format!(
        "### {headline}\n\n- **Time**: {time}\n- **Content**: {content}\n\n[Open]({})",
        delta.jump_url
    );
    if let Some(keyword) = keyword {
        text.push_str(&format!("\n\n> {keyword}"));
    }

    WebhookPayload { title, text }
}

/// Cuts `text` to `max_chars` characters, marking the cut with an ellipsis.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", &text[..byte_idx]),
        None => text.to_string(),
    }
}
