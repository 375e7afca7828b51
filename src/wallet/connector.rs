use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::WhitelistConfig;
use crate::error::Error;
use crate::wallet::EthWallet;

/// Wallet connector
///
/// The single shared source of signing capability. Constructed once, held by
/// the session context, and connected lazily on first use; the mutex keeps
/// the wallet from being reinitialized while a connection attempt is
/// outstanding. A connection attempt with no credentials configured is a
/// rejection, not an internal error.
pub struct WalletConnector {
    mnemonic: Option<SecretString>,
    account_index: u32,
    wallet: Mutex<Option<Arc<EthWallet>>>,
}

impl WalletConnector {
    /// Create a connector from resolved configuration
    pub fn new(config: &WhitelistConfig) -> Self {
        Self {
            mnemonic: config.mnemonic().cloned(),
            account_index: config.account_index,
            wallet: Mutex::new(None),
        }
    }

    /// Create a connector with explicit credentials
    pub fn with_mnemonic(mnemonic: SecretString, account_index: u32) -> Self {
        Self {
            mnemonic: Some(mnemonic),
            account_index,
            wallet: Mutex::new(None),
        }
    }

    /// Whether credentials are configured at all
    pub fn has_credentials(&self) -> bool {
        self.mnemonic.is_some()
    }

    /// Connect the wallet, reusing the existing connection if one was
    /// already established
    pub async fn connect(&self) -> Result<Arc<EthWallet>, Error> {
        let mut guard = self.wallet.lock().await;
        if let Some(wallet) = guard.as_ref() {
            return Ok(wallet.clone());
        }

        let mnemonic = self.mnemonic.as_ref().ok_or_else(|| {
            Error::UserRejected("no wallet credentials configured".to_string())
        })?;

        let wallet = Arc::new(EthWallet::from_mnemonic(
            mnemonic.expose_secret(),
            self.account_index,
        )?);
        debug!(address = ?wallet.address().ok(), "wallet connected");

        *guard = Some(wallet.clone());
        Ok(wallet)
    }
}
