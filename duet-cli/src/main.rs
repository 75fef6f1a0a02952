mod call;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};
use duet::DEFAULT_STUN_ADDR;
use duet::relay::{DEFAULT_BIND, RelayConfig};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duet", version, about = "Two-party video call client and relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Relay {
        #[arg(long, default_value_t = DEFAULT_BIND)]
        bind: SocketAddr,
    },
    /// Connect to a relay and place or answer a call.
    Call {
        #[arg(long, default_value = "ws://localhost:8765")]
        url: String,

        /// STUN/TURN server URL; repeat for several.
        #[arg(long = "stun", default_value = DEFAULT_STUN_ADDR)]
        stun: Vec<String>,

        #[arg(long, default_value_t = 1000)]
        probe_interval_ms: u64,

        /// Send audio only.
        #[arg(long)]
        no_video: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match Cli::parse().command {
        Commands::Relay { bind } => duet::relay::run(RelayConfig { bind }).await,
        Commands::Call {
            url,
            stun,
            probe_interval_ms,
            no_video,
        } => {
            call::run(call::CallArgs {
                url,
                stun,
                probe_interval_ms,
                no_video,
            })
            .await
        }
    }
}
