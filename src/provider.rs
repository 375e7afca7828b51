use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::WhitelistConfig;
use crate::error::Error;
use crate::evm::EvmClient;
use crate::wallet::{EthWallet, WalletConnector};

/// Signing capability: a verified connection plus the connected wallet
pub struct SignerHandle {
    pub client: EvmClient,
    pub wallet: Arc<EthWallet>,
}

impl SignerHandle {
    /// Address transactions will be sent from
    pub fn address(&self) -> Result<alloy_primitives::Address, Error> {
        self.wallet.address()
    }
}

/// Provider gateway
///
/// Obtains a connection handle to the chain, verifies the chain identity
/// against the configured network, and optionally pairs it with signing
/// capability from the wallet connector. The underlying provider is built
/// once on first acquisition and reused; the chain check happens before the
/// handle is ever handed out, so a handle for the wrong network cannot
/// exist.
pub struct ProviderGateway {
    config: WhitelistConfig,
    connector: WalletConnector,
    client: Mutex<Option<EvmClient>>,
}

impl ProviderGateway {
    /// Create a gateway over the given configuration and connector
    pub fn new(config: WhitelistConfig, connector: WalletConnector) -> Self {
        Self {
            config,
            connector,
            client: Mutex::new(None),
        }
    }

    /// Resolved configuration this gateway connects with
    pub fn config(&self) -> &WhitelistConfig {
        &self.config
    }

    /// Acquire a read-only connection handle.
    ///
    /// Fails with [`Error::NetworkMismatch`] when the node reports a chain
    /// id other than the configured one; no handle is returned in that
    /// case.
    pub async fn acquire(&self) -> Result<EvmClient, Error> {
        let mut guard = self.client.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let required = self.config.required_chain_id();
        let client = EvmClient::new(&self.config.rpc_url, required).await?;

        let actual = client.node_chain_id().await?;
        if actual != required {
            warn!(expected = required, actual, "connected node is on the wrong network");
            return Err(Error::NetworkMismatch {
                expected: required,
                actual,
            });
        }
        debug!(chain_id = actual, rpc = %self.config.rpc_url, "provider acquired");

        *guard = Some(client.clone());
        Ok(client)
    }

    /// Acquire a signing handle: a verified connection plus wallet
    /// credentials from the connector.
    ///
    /// Fails with [`Error::UserRejected`] when the connector declines the
    /// connection attempt.
    pub async fn acquire_signer(&self) -> Result<SignerHandle, Error> {
        let client = self.acquire().await?;
        let wallet = self.connector.connect().await?;
        Ok(SignerHandle { client, wallet })
    }
}
