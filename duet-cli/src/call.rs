use crate::status::{MenuAction, RelayWatch, menu_actions, render_status};
use anyhow::{Context, Result};
use colored::*;
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use duet::client::media::SyntheticMediaSource;
use duet::client::{
    Collaborators, SessionConfig, SessionController, SessionHandle, TransportConfig,
};
use duet::model::IceServerConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub struct CallArgs {
    pub url: String,
    pub stun: Vec<String>,
    pub probe_interval_ms: u64,
    pub no_video: bool,
}

pub async fn run(args: CallArgs) -> Result<()> {
    let mut config = SessionConfig::new(&args.url);
    config.probe_interval = Duration::from_millis(args.probe_interval_ms.max(1));
    config.transport = TransportConfig {
        ice_servers: args.stun.into_iter().map(IceServerConfig::stun).collect(),
    };

    let collaborators = Collaborators {
        media: Arc::new(SyntheticMediaSource {
            video: !args.no_video,
            ..Default::default()
        }),
        ..Default::default()
    };

    println!("{}", format!("Connecting to {}...", args.url).cyan());
    let (controller, handle) = SessionController::connect(config, collaborators)
        .await
        .with_context(|| format!("Failed to reach relay at {}", args.url))?;
    let session = tokio::spawn(controller.run());

    let mut updates = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(5), updates.wait_for(|s| s.channel_open))
        .await
        .context("Relay channel did not open in time")?
        .context("Session ended before the relay channel opened")?;

    menu_loop(&handle).await?;

    if let Err(e) = handle.shutdown().await {
        warn!("Session already stopped: {}", e);
    }
    session.await.context("Session task failed")?;
    println!("{}", "Bye.".green().bold());
    Ok(())
}

async fn menu_loop(handle: &SessionHandle) -> Result<()> {
    let mut relay = RelayWatch::default();
    loop {
        let snapshot = handle.snapshot();
        if relay.lost(&snapshot) {
            println!("{}", "Relay connection lost.".red().bold());
            return Ok(());
        }

        let actions = menu_actions(&snapshot);
        let labels: Vec<&'static str> = actions.iter().map(|a| a.label()).collect();

        let picked = tokio::task::spawn_blocking(move || {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt("duet")
                .items(&labels[..])
                .default(0)
                .interact()
        })
        .await
        .context("Menu task panicked")??;

        match actions[picked] {
            MenuAction::Join => {
                handle.join().await?;
                println!("{}", "Joining call...".cyan());
            }
            MenuAction::Leave => {
                handle.leave().await?;
                println!("{}", "Left the call.".yellow());
            }
            MenuAction::Status => {
                for line in render_status(&handle.snapshot()) {
                    println!("  {line}");
                }
            }
            MenuAction::Quit => return Ok(()),
        }
    }
}
