use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use whitelist_sdk::{
    run_tui, ChainBackend, ProviderGateway, SessionController, WalletConnector, WhitelistConfig,
};

#[derive(Parser)]
#[command(name = "whitelist-tui", about = "Terminal UI for the on-chain whitelist", version)]
struct Cli {
    /// Network to connect to
    #[arg(long)]
    network: Option<String>,

    /// RPC endpoint override
    #[arg(long)]
    rpc_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Raw-mode terminal owns stdout; keep diagnostics on stderr and off by
    // default
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = WhitelistConfig::load(cli.network.as_deref())?;
    if let Some(rpc_url) = cli.rpc_url {
        config.set_rpc_url(rpc_url)?;
    }

    let connector = WalletConnector::new(&config);
    let gateway = ProviderGateway::new(config, connector);
    let session = SessionController::new(ChainBackend::new(gateway));

    run_tui(session).await?;
    Ok(())
}
