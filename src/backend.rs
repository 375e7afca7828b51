//! Chain-backed session backend
//!
//! Wires the session's backend seam to the real stack: provider gateway for
//! handles, whitelist contract helper for the calls.

use alloy_primitives::B256;
use async_trait::async_trait;

use crate::contracts::{JoinReceipt, WhitelistContract};
use crate::error::Error;
use crate::provider::ProviderGateway;
use crate::session::WhitelistBackend;

/// Backend that talks to the deployed contract over RPC
pub struct ChainBackend {
    gateway: ProviderGateway,
}

impl ChainBackend {
    /// Create a backend over the given gateway
    pub fn new(gateway: ProviderGateway) -> Self {
        Self { gateway }
    }

    /// The gateway this backend acquires handles from
    pub fn gateway(&self) -> &ProviderGateway {
        &self.gateway
    }

    async fn contract(&self) -> Result<WhitelistContract, Error> {
        let client = self.gateway.acquire().await?;
        let address = *self.gateway.config().contract_address.inner();
        Ok(WhitelistContract::new(client, address))
    }
}

#[async_trait]
impl WhitelistBackend for ChainBackend {
    async fn connect(&self) -> Result<(), Error> {
        self.gateway.acquire().await.map(|_| ())
    }

    async fn member_status(&self) -> Result<bool, Error> {
        // The caller's address comes from the signer, so membership checks
        // need the wallet even though the read itself does not sign.
        let signer = self.gateway.acquire_signer().await?;
        let address = signer.address()?;
        let contract = self.contract().await?;
        contract.is_member(address).await
    }

    async fn member_count(&self) -> Result<u64, Error> {
        let contract = self.contract().await?;
        contract.count().await
    }

    async fn submit_join(&self) -> Result<B256, Error> {
        let signer = self.gateway.acquire_signer().await?;
        let contract = self.contract().await?;
        contract.submit_join(&signer.wallet).await
    }

    async fn await_confirmation(&self, tx_hash: B256) -> Result<JoinReceipt, Error> {
        let contract = self.contract().await?;
        contract.confirm_join(tx_hash).await
    }
}
