use crate::error::Error;
use crate::evm::tx::Eip1559Transaction;
use crate::evm::types::{EthAddress, EvmCallRequest};
use crate::wallet::EthWallet;
/// EVM client
///
/// Thin wrapper over an Alloy HTTP provider: read-only contract calls,
/// EIP-1559 transaction submission, and receipt polling. Response decoding
/// happens here so malformed contract output surfaces as a read error
/// instead of leaking loosely-typed values upward.
use alloy_primitives::{Address, B256, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types_eth::{BlockNumberOrTag, TransactionReceipt, TransactionRequest};
use alloy_sol_types::SolCall;
use alloy_transport_http::{Client, Http};
use std::time::Duration;
use tracing::debug;

/// Interval between receipt polls while waiting for confirmation
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Multiplier applied to gas estimates (num/den)
const GAS_ADJUSTMENT: (u64, u64) = (12, 10);

/// EVM client for blockchain interactions
#[derive(Clone)]
pub struct EvmClient {
    /// Alloy provider for RPC communication
    provider: alloy_provider::RootProvider<Http<Client>>,
    /// Chain ID for transaction signing
    chain_id: u64,
}

impl EvmClient {
    /// Create a new EVM client with the given RPC endpoint and chain ID
    pub async fn new(rpc_url: &str, chain_id: u64) -> Result<Self, Error> {
        let url = reqwest::Url::parse(rpc_url)
            .map_err(|e| Error::Config(format!("invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new().on_http(url);

        Ok(Self { provider, chain_id })
    }

    /// Chain ID this client signs for
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Chain ID as reported by the connected node
    pub async fn node_chain_id(&self) -> Result<u64, Error> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Rpc(e.to_string()))
    }

    /// Execute a read-only contract call
    pub async fn call(&self, request: EvmCallRequest) -> Result<Vec<u8>, Error> {
        let tx_request = TransactionRequest {
            to: Some(alloy_primitives::TxKind::Call(request.to.0)),
            input: request.data.into(),
            ..Default::default()
        };

        let result = self
            .provider
            .call(&tx_request)
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?;

        Ok(result.to_vec())
    }

    /// Call a contract method (read-only) with typed encode/decode
    pub async fn call_contract<T: SolCall>(
        &self,
        contract_address: Address,
        call: T,
    ) -> Result<T::Return, Error> {
        let data = call.abi_encode();
        let request = EvmCallRequest::new(EthAddress(contract_address), data);
        let result = self.call(request).await?;
        let decoded = T::abi_decode_returns(&result, false)
            .map_err(|e| Error::ContractRead(format!("failed to decode call result: {}", e)))?;
        Ok(decoded)
    }

    /// Estimate gas for a contract call from the given sender
    pub async fn estimate_gas(
        &self,
        from: Address,
        to: Address,
        data: Vec<u8>,
        value: U256,
    ) -> Result<u64, Error> {
        let tx_request = TransactionRequest {
            from: Some(from),
            to: Some(alloy_primitives::TxKind::Call(to)),
            value: Some(value),
            input: data.into(),
            ..Default::default()
        };

        let gas = self
            .provider
            .estimate_gas(&tx_request)
            .await
            .map_err(|e| Error::Rpc(format!("gas estimation failed: {}", e)))?;

        Ok(gas)
    }

    /// Get the next nonce for an address
    pub async fn get_nonce(&self, address: Address) -> Result<u64, Error> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| Error::Rpc(e.to_string()))
    }

    /// Get the current gas price (legacy)
    pub async fn get_gas_price(&self) -> Result<U256, Error> {
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?;

        Ok(U256::from(gas_price))
    }

    /// Get EIP-1559 fee data as (base fee, priority fee)
    pub async fn get_fee_data(&self) -> Result<(U256, U256), Error> {
        let fee_history = self
            .provider
            .get_fee_history(1, BlockNumberOrTag::Latest, &[50.0])
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?;

        if let (Some(base_fee), Some(reward)) = (
            fee_history.base_fee_per_gas.last(),
            fee_history
                .reward
                .as_ref()
                .and_then(|r| r.last())
                .and_then(|r| r.first()),
        ) {
            Ok((U256::from(*base_fee), U256::from(*reward)))
        } else {
            // Fallback to gas price
            let gas_price = self.get_gas_price().await?;
            Ok((gas_price, gas_price / U256::from(10)))
        }
    }

    /// Get transaction receipt by hash
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<Option<TransactionReceipt>, Error> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?;

        Ok(receipt)
    }

    /// Sign and submit a contract call, returning the transaction hash.
    /// Submission only; confirmation is a separate wait.
    pub async fn send_contract_call<T: SolCall>(
        &self,
        contract_address: Address,
        call: T,
        wallet: &EthWallet,
        value: Option<U256>,
    ) -> Result<B256, Error> {
        let data = call.abi_encode();
        self.send_transaction_data(contract_address, data, value.unwrap_or_default(), wallet)
            .await
    }

    /// Sign and submit raw calldata as an EIP-1559 transaction
    pub async fn send_transaction_data(
        &self,
        to: Address,
        data: Vec<u8>,
        value: U256,
        wallet: &EthWallet,
    ) -> Result<B256, Error> {
        let from = wallet.address()?;

        let nonce = self.get_nonce(from).await?;
        let (base_fee, priority_fee) = self.get_fee_data().await?;
        let max_fee = base_fee
            .checked_mul(U256::from(2))
            .and_then(|f| f.checked_add(priority_fee))
            .ok_or_else(|| Error::Rpc("fee calculation overflow".to_string()))?;
        let max_fee = u128::try_from(max_fee)
            .map_err(|_| Error::Rpc("base fee out of range".to_string()))?;
        let priority_fee = u128::try_from(priority_fee)
            .map_err(|_| Error::Rpc("priority fee out of range".to_string()))?;

        let estimate = self.estimate_gas(from, to, data.clone(), value).await?;
        let gas_limit = estimate.saturating_mul(GAS_ADJUSTMENT.0) / GAS_ADJUSTMENT.1;

        let tx = Eip1559Transaction::new(self.chain_id, nonce)
            .to(Some(to))
            .value(value)
            .data(data.into())
            .gas_limit(gas_limit)
            .max_fee_per_gas(max_fee)
            .max_priority_fee_per_gas(priority_fee);

        let signed = wallet.sign_eip1559(&tx)?;
        let tx_hash = signed.hash();

        self.provider
            .send_raw_transaction(signed.raw().as_ref())
            .await
            .map_err(|e| Error::Rpc(format!("transaction submission failed: {}", e)))?;

        debug!(%tx_hash, nonce, gas_limit, "transaction submitted");
        Ok(tx_hash)
    }

    /// Wait until the transaction is included in a block and return its
    /// receipt. Polls with no deadline; dropping the future abandons the
    /// wait.
    pub async fn wait_for_confirmation(&self, tx_hash: B256) -> Result<TransactionReceipt, Error> {
        loop {
            if let Some(receipt) = self.get_transaction_receipt(tx_hash).await? {
                debug!(%tx_hash, block = ?receipt.block_number, "transaction included");
                return Ok(receipt);
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}
