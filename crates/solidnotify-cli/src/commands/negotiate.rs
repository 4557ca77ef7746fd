//! Connection negotiation command.

use super::{load_config, TargetArgs};
use solidnotify_client::NegotiationClient;
use solidnotify_core::PROTOCOL_WS;
use std::path::Path;
use tracing::info;

/// Run the negotiate command.
pub async fn run(args: TargetArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let client = NegotiationClient::new(
        args.topic()?,
        vec![PROTOCOL_WS.to_string()],
        args.options(&config)?,
    )?;

    let connection = client.negotiate_connection().await?;
    if let Some(gateway) = client.gateway() {
        info!("Negotiated through gateway {}", gateway);
    }

    println!("{}", serde_json::to_string_pretty(&connection)?);
    Ok(())
}
