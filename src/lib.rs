pub mod backend;
pub mod config;
pub mod contracts;
pub mod error;
pub mod evm;
pub mod provider;
pub mod session;
pub mod wallet;

// Terminal UI - optional via "tui" feature
#[cfg(feature = "tui")]
pub mod tui;

// Main exports
pub use backend::ChainBackend;
pub use config::{NetworkConstants, WhitelistConfig};
pub use contracts::{IWhitelist, JoinReceipt, WhitelistContract};
pub use error::Error;
pub use evm::{EthAddress, EvmClient};
pub use provider::{ProviderGateway, SignerHandle};
pub use session::{
    Action, SessionController, SessionState, View, WhitelistBackend, NETWORK_SWITCH_NOTICE,
};
pub use wallet::{EthWallet, WalletConnector};

// Re-export the TUI entry point when the feature is enabled
#[cfg(feature = "tui")]
pub use tui::run_tui;
