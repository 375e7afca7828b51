/// Whitelist contract helpers
///
/// High-level methods for the deployed whitelist contract: two reads and
/// one write. The write submits the join call and, separately, waits for
/// on-chain inclusion; reads never require signing capability.
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_sol_types::sol;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Error;
use crate::evm::EvmClient;
use crate::wallet::EthWallet;

sol! {
    #[derive(Debug)]
    interface IWhitelist {
        /// Add the caller to the whitelist
        function addToWhitelist() external;

        /// Total number of whitelisted addresses
        function getWhiteListCount() external view returns (uint256);

        /// Whether an address is on the whitelist
        function whitelistedAddresses(address addr) external view returns (bool);
    }
}

/// Receipt for a confirmed join transaction
#[derive(Debug, Clone)]
pub struct JoinReceipt {
    /// Hash of the confirmed transaction
    pub tx_hash: B256,
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    /// Local time the confirmation was observed
    pub confirmed_at: DateTime<Utc>,
}

impl JoinReceipt {
    fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            confirmed_at: Utc::now(),
        }
    }
}

/// Whitelist contract helper
pub struct WhitelistContract {
    client: EvmClient,
    address: Address,
}

impl WhitelistContract {
    /// Create a helper for the deployed contract at the given address
    pub fn new(client: EvmClient, address: Address) -> Self {
        Self { client, address }
    }

    /// Get the contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Total number of whitelisted addresses
    pub async fn count(&self) -> Result<u64, Error> {
        let call = IWhitelist::getWhiteListCountCall {};
        let result = self.client.call_contract(self.address, call).await?;
        if result._0 > U256::from(u64::MAX) {
            return Err(Error::ContractRead(format!(
                "whitelist count out of range: {}",
                result._0
            )));
        }
        Ok(result._0.to::<u64>())
    }

    /// Whether the given address is on the whitelist
    pub async fn is_member(&self, addr: Address) -> Result<bool, Error> {
        let call = IWhitelist::whitelistedAddressesCall { addr };
        let result = self.client.call_contract(self.address, call).await?;
        Ok(result._0)
    }

    /// Encode the join call data
    pub fn encode_join(&self) -> Vec<u8> {
        use alloy_sol_types::SolCall;
        let call = IWhitelist::addToWhitelistCall {};
        call.abi_encode()
    }

    /// Submit the join transaction, returning its hash. The transaction is
    /// in flight after this returns; use [`confirm_join`] to await
    /// inclusion.
    ///
    /// [`confirm_join`]: WhitelistContract::confirm_join
    pub async fn submit_join(&self, wallet: &EthWallet) -> Result<B256, Error> {
        let call = IWhitelist::addToWhitelistCall {};
        let tx_hash = self
            .client
            .send_contract_call(self.address, call, wallet, None)
            .await?;
        debug!(%tx_hash, contract = %self.address, "join submitted");
        Ok(tx_hash)
    }

    /// Wait for a submitted join to be included in a block. A receipt with
    /// a failed status (e.g. the address was already a member) yields
    /// [`Error::TransactionReverted`]; revert reasons are not
    /// distinguished.
    pub async fn confirm_join(&self, tx_hash: B256) -> Result<JoinReceipt, Error> {
        let receipt = self.client.wait_for_confirmation(tx_hash).await?;
        if !receipt.status() {
            return Err(Error::TransactionReverted(format!(
                "join transaction {} failed on-chain",
                tx_hash
            )));
        }
        Ok(JoinReceipt::from_receipt(&receipt))
    }
}
