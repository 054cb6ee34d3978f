use std::{future::Future, sync::Arc};

use futures_util::stream::StreamExt;
use lapin::{BasicProperties, Connection, ConnectionProperties, options::*, types::FieldTable};
use tokio_executor_trait::Tokio as TokioExec;
use tokio_reactor_trait::Tokio as TokioReactor;

use crate::config::Config;
use crate::notification::models::Notification;

pub const NOTIFICATIONS_QUEUE: &str = "notifications";

async fn connect(url: &str) -> Result<Connection, lapin::Error> {
    Connection::connect(
        url,
        ConnectionProperties::default()
            .with_executor(TokioExec::current())
            .with_reactor(TokioReactor),
    )
    .await
}

pub async fn publish_event(url: &str, queue: &str, payload: &str) -> Result<(), lapin::Error> {
    let channel = connect(url).await?.create_channel().await?;

    channel
        .queue_declare(queue, QueueDeclareOptions::default(), FieldTable::default())
        .await?;

    channel
        .basic_publish(
            "",
            queue,
            BasicPublishOptions::default(),
            payload.as_bytes(),
            BasicProperties::default(),
        )
        .await?
        .await?;

    Ok(())
}

pub async fn consume<Fut, E>(
    url: &str,
    queue: &str,
    consumer_tag: &str,
    config: Arc<Config>,
    handler: impl Fn(Notification, Arc<Config>) -> Fut + Send + Sync + 'static,
) -> Result<(), lapin::Error>
where
    Fut: Future<Output = Result<(), E>> + Send,
    E: std::fmt::Display,
{
    let channel = connect(url).await?.create_channel().await?;

    channel
        .queue_declare(queue, QueueDeclareOptions::default(), FieldTable::default())
        .await?;

    let mut consumer = channel
        .basic_consume(
            queue,
            consumer_tag,
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;

    while let Some(delivery) = consumer.next().await {
        let delivery = delivery?;
        let data = String::from_utf8_lossy(&delivery.data);

        match serde_json::from_str::<Notification>(&data) {
            Ok(notification) => {
                if let Err(e) = handler(notification, config.clone()).await {
                    tracing::warn!("failed to handle notification: {e}");
                }
            }
            Err(e) => tracing::warn!(%data, "failed to parse a message: {e}"),
        }

        delivery.ack(BasicAckOptions::default()).await?;
    }

    Ok(())
}

pub fn spawn_consumer(config: Arc<Config>) {
    let Some(url) = config.rmq_url.clone() else {
        tracing::info!("RMQ_URL not set, notification consumer disabled");
        return;
    };

    tokio::spawn(async move {
        if let Err(e) = consume(
            &url,
            NOTIFICATIONS_QUEUE,
            "storefront-mailer",
            config,
            crate::notification::handlers::send_email,
        )
        .await
        {
            tracing::error!("notification consumer stopped: {e}");
        }
    });
}
