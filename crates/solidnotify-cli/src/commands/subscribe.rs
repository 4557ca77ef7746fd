//! Live subscription command.

use super::{load_config, TargetArgs};
use clap::Args;
use solidnotify_client::{
    EventKind, LiveNotification, NotificationEvent, WebsocketNotification,
};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use url::Url;

/// How long to wait for the socket to close after Ctrl-C.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Subscribe command arguments.
#[derive(Args, Debug)]
pub struct SubscribeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// WebSocket endpoint; skips negotiation
    #[arg(long)]
    pub endpoint: Option<Url>,

    /// WebSocket subprotocol to request
    #[arg(long)]
    pub subprotocol: Option<String>,

    /// Exit after this many notifications
    #[arg(long)]
    pub count: Option<usize>,
}

/// Events forwarded from listeners to the command loop.
#[derive(Debug)]
enum Update {
    Message(serde_json::Value),
    Error(String),
    Closed,
}

/// Run the subscribe command.
pub async fn run(args: SubscribeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let notification =
        WebsocketNotification::new(args.target.topic()?, args.target.options(&config)?)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    forward(&notification, tx);

    let subprotocol = args
        .subprotocol
        .clone()
        .or_else(|| config.subscription.subprotocol.clone());
    notification.connect(args.endpoint.clone(), subprotocol).await?;

    info!(
        "Subscribed to {} via {}",
        notification.topic(),
        notification
            .endpoint()
            .map(|u| u.to_string())
            .unwrap_or_default()
    );

    let mut received = 0usize;
    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Some(Update::Message(value)) => {
                    println!("{}", serde_json::to_string(&value)?);
                    received += 1;
                    if args.count.is_some_and(|count| received >= count) {
                        notification.disconnect()?;
                        wait_closed(&mut rx).await;
                        break;
                    }
                }
                Some(Update::Error(e)) => warn!("Notification error: {}", e),
                Some(Update::Closed) | None => {
                    info!("Connection closed by server");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, closing subscription");
                notification.disconnect()?;
                wait_closed(&mut rx).await;
                break;
            }
        }
    }

    Ok(())
}

fn forward(notification: &WebsocketNotification, tx: mpsc::UnboundedSender<Update>) {
    let messages = tx.clone();
    notification.on(EventKind::Message, move |event| {
        if let NotificationEvent::Message(value) = event {
            let _ = messages.send(Update::Message(value.clone()));
        }
    });

    let errors = tx.clone();
    notification.on(EventKind::Error, move |event| {
        if let NotificationEvent::Error(e) = event {
            let _ = errors.send(Update::Error(e.to_string()));
        }
    });

    notification.once(EventKind::Closed, move |_| {
        let _ = tx.send(Update::Closed);
    });
}

async fn wait_closed(rx: &mut mpsc::UnboundedReceiver<Update>) {
    let closed = async {
        while let Some(update) = rx.recv().await {
            if matches!(update, Update::Closed) {
                break;
            }
        }
    };
    if tokio::time::timeout(CLOSE_TIMEOUT, closed).await.is_err() {
        warn!("Timed out waiting for the socket to close");
    }
}
