pub mod handlers;
pub mod models;

use std::sync::Arc;

use crate::config::Config;
use crate::rmq::client::{NOTIFICATIONS_QUEUE, publish_event};
use models::Notification;

/// Publishes `notification` in the background; failures are only logged.
pub fn notify(config: &Arc<Config>, notification: Notification) {
    let Some(url) = config.rmq_url.clone() else {
        tracing::debug!(?notification, "RMQ_URL not set, skipping notification");
        return;
    };

    tokio::spawn(async move {
        let payload = match serde_json::to_string(&notification) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("failed to serialize notification: {e}");
                return;
            }
        };

        if let Err(e) = publish_event(&url, NOTIFICATIONS_QUEUE, &payload).await {
            tracing::warn!("failed to publish notification: {e}");
        }
    });
}
