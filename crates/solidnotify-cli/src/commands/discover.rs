//! Gateway discovery command.

use super::{load_config, TargetArgs};
use solidnotify_client::{NegotiationClient, NotificationError};
use solidnotify_core::PROTOCOL_WS;
use std::path::Path;

/// Run the discover command.
pub async fn run(args: TargetArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let client = NegotiationClient::new(
        args.topic()?,
        vec![PROTOCOL_WS.to_string()],
        args.options(&config)?,
    )?;

    let gateway = match client.resolve_gateway().await {
        Ok(gateway) => gateway,
        Err(e @ NotificationError::NotSupported(_)) => {
            anyhow::bail!("{} does not advertise a notification gateway: {}", client.host(), e)
        }
        Err(e) => return Err(e.into()),
    };

    let report = serde_json::json!({
        "topic": client.topic(),
        "host": client.host(),
        "gateway": gateway,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
