// Allow deprecated Signature for compatibility with alloy-consensus ecosystem
#![allow(deprecated)]

use alloy_consensus::{SignableTransaction, Signed, TxEip1559};
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, Bytes, ChainId, Signature, TxKind, B256, U256};

/// Builder for EIP-1559 transactions destined for the whitelist contract.
/// Value, calldata and access list default to empty.
#[derive(Clone, Debug)]
pub struct Eip1559Transaction {
    pub chain_id: ChainId,
    pub nonce: u64,
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
}

impl Eip1559Transaction {
    pub fn new(chain_id: u64, nonce: u64) -> Self {
        Self {
            chain_id,
            nonce,
            gas_limit: 21_000,
            max_fee_per_gas: 0,
            max_priority_fee_per_gas: 0,
            to: None,
            value: U256::ZERO,
            data: Bytes::new(),
        }
    }

    /// Set the target address (None implies contract creation)
    pub fn to(mut self, to: Option<Address>) -> Self {
        self.to = to;
        self
    }

    /// Set the value (in wei) to transfer
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Set the calldata payload
    pub fn data(mut self, data: Bytes) -> Self {
        self.data = data;
        self
    }

    /// Set the gas limit
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Set the max fee per gas (wei)
    pub fn max_fee_per_gas(mut self, max_fee: u128) -> Self {
        self.max_fee_per_gas = max_fee;
        self
    }

    /// Set the priority fee per gas (tip) in wei
    pub fn max_priority_fee_per_gas(mut self, tip: u128) -> Self {
        self.max_priority_fee_per_gas = tip;
        self
    }

    fn as_alloy(&self) -> TxEip1559 {
        TxEip1559 {
            chain_id: self.chain_id,
            nonce: self.nonce,
            gas_limit: self.gas_limit,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            to: self.to.map(TxKind::Call).unwrap_or(TxKind::Create),
            value: self.value,
            access_list: AccessList::default(),
            input: self.data.clone(),
        }
    }

    /// Bytes that should be hashed (keccak256) for signing
    pub fn encoded_for_signing(&self) -> Vec<u8> {
        self.as_alloy().encoded_for_signing()
    }

    /// Signature hash (keccak256) of the transaction
    pub fn signature_hash(&self) -> B256 {
        self.as_alloy().signature_hash()
    }

    /// Encode the signed transaction into raw bytes suitable for
    /// `eth_sendRawTransaction`
    pub fn encode_signed(&self, signature: &Signature) -> Bytes {
        let tx = self.as_alloy();
        let mut buf = Vec::with_capacity(tx.encoded_len_with_signature(signature, false));
        tx.encode_with_signature(signature, &mut buf, false);
        Bytes::from(buf)
    }

    /// Combine with a signature, producing a signed transaction
    pub fn into_signed(self, signature: Signature) -> Signed<TxEip1559> {
        self.as_alloy().into_signed(signature)
    }
}

/// Fully signed transaction plus its raw submission payload
#[derive(Clone, Debug)]
pub struct SignedEip1559Transaction {
    signed: Signed<TxEip1559>,
    raw: Bytes,
}

impl SignedEip1559Transaction {
    pub fn new(signed: Signed<TxEip1559>, raw: Bytes) -> Self {
        Self { signed, raw }
    }

    /// Raw bytes ready to be sent via `eth_sendRawTransaction`
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Transaction hash computed from the signed payload
    pub fn hash(&self) -> B256 {
        *self.signed.hash()
    }

    /// Access signature data (v, r, s)
    pub fn signature(&self) -> &Signature {
        self.signed.signature()
    }
}
