use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

mod repl;

#[derive(Parser, Debug)]
#[command(
    name = "polychat",
    version,
    about = "Chat with multiple AI personas from your terminal"
)]
struct Cli {
    /// Path to a YAML config file (default: $POLYCHAT_CONFIG, then
    /// ~/.config/polychat/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

// Bare level directive: a `polychat=` prefix would miss the polychat_*
// library targets.
const DEFAULT_LOG_DIRECTIVES: &str = "warn";

fn log_directives() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_DIRECTIVES.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_directives())
        .init();

    let cli = Cli::parse();
    let config = polychat::ChatConfig::load(cli.config.as_deref())?;
    let session = polychat::session_from_config(&config)
        .context("failed to initialize chat session")?;

    info!(
        provider = %config.provider,
        model = %config.generation.model,
        window = config.window,
        "session ready"
    );

    repl::run(session).await
}
