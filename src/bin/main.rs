use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use whitelist_sdk::{
    ChainBackend, Error, EthAddress, EthWallet, ProviderGateway, SessionController,
    WalletConnector, WhitelistConfig,
};

#[derive(Parser)]
#[command(name = "whitelist", about = "Client for the on-chain whitelist", version)]
struct Cli {
    /// Network to connect to
    #[arg(long, global = true)]
    network: Option<String>,

    /// RPC endpoint override
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Whitelist contract address override
    #[arg(long, global = true)]
    contract: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect the wallet and show whitelist status
    Status,
    /// Join the whitelist and wait for on-chain confirmation
    Join,
    /// Follow the whitelist count, re-fetching on an interval
    Watch {
        /// Seconds between fetches
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
    /// Show the configured wallet address, or generate a new wallet
    Wallet {
        /// Generate a fresh wallet and print its mnemonic
        #[arg(long)]
        generate: bool,
    },
}

fn load_config(cli: &Cli) -> Result<WhitelistConfig> {
    let mut config = WhitelistConfig::load(cli.network.as_deref())?;
    if let Some(rpc_url) = &cli.rpc_url {
        config.set_rpc_url(rpc_url.clone())?;
    }
    if let Some(contract) = &cli.contract {
        config.set_contract_address(EthAddress::from_str(contract)?);
    }
    Ok(config)
}

fn session_for(config: WhitelistConfig) -> SessionController<ChainBackend> {
    let connector = WalletConnector::new(&config);
    let gateway = ProviderGateway::new(config, connector);
    SessionController::new(ChainBackend::new(gateway))
}

/// Connect, rendering a network mismatch as the blocking notice it is
async fn connect(session: &mut SessionController<ChainBackend>) -> Result<(), ExitCode> {
    match session.connect_wallet().await {
        Ok(()) => Ok(()),
        Err(e @ Error::NetworkMismatch { .. }) => {
            if let Some(notice) = session.view().notice {
                eprintln!("{}", notice);
            }
            eprintln!("error: {}", e);
            Err(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            Err(ExitCode::FAILURE)
        }
    }
}

fn print_view(session: &SessionController<ChainBackend>) {
    let view = session.view();
    println!("{}", view.count_line());
    println!("{}", view.action.label());
    if let Some(notice) = view.notice {
        println!("notice: {}", notice);
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Status => {
            let mut session = session_for(load_config(&cli)?);
            if let Err(code) = connect(&mut session).await {
                return Ok(code);
            }
            print_view(&session);
            Ok(ExitCode::SUCCESS)
        }
        Command::Join => {
            let mut session = session_for(load_config(&cli)?);
            if let Err(code) = connect(&mut session).await {
                return Ok(code);
            }
            if session.whitelist_status() == Some(true) {
                println!("{}", session.view().action.label());
                return Ok(ExitCode::SUCCESS);
            }
            println!("Submitting join transaction...");
            session.join_whitelist().await?;
            print_view(&session);
            // A join that did not land leaves a notice behind
            Ok(if session.view().notice.is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Watch { interval } => {
            let mut session = session_for(load_config(&cli)?);
            if let Err(code) = connect(&mut session).await {
                return Ok(code);
            }
            let mut last = session.whitelist_count();
            print_view(&session);
            loop {
                tokio::time::sleep(Duration::from_secs(interval)).await;
                session.refresh().await;
                let count = session.whitelist_count();
                if count != last {
                    last = count;
                    println!("{}", session.view().count_line());
                }
            }
        }
        Command::Wallet { generate } => {
            if generate {
                let (wallet, phrase) = EthWallet::generate()?;
                println!("address:  {:?}", wallet.address()?);
                println!("mnemonic: {}", phrase);
                println!("Store the mnemonic somewhere safe; it is not persisted.");
                return Ok(ExitCode::SUCCESS);
            }
            let config = load_config(&cli)?;
            let connector = WalletConnector::new(&config);
            match connector.connect().await {
                Ok(wallet) => {
                    println!("address: {:?}", wallet.address()?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    warn!(error = %e, "wallet connection failed");
                    eprintln!("error: {}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).await
}
