/// EVM boundary types
///
/// Address and request types used at the edge of the provider layer, with
/// parsing and validation so malformed external input fails early.
use crate::error::Error;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ethereum address wrapper, parsed and validated at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthAddress(pub Address);

impl EthAddress {
    /// Create from raw bytes
    pub fn from_slice(bytes: &[u8; 20]) -> Self {
        Self(Address::from(bytes))
    }

    /// Get the underlying alloy Address
    pub fn inner(&self) -> &Address {
        &self.0
    }
}

impl FromStr for EthAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let addr = Address::from_str(s)
            .map_err(|e| Error::Config(format!("invalid Ethereum address '{}': {}", s, e)))?;
        Ok(Self(addr))
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<Address> for EthAddress {
    fn from(addr: Address) -> Self {
        Self(addr)
    }
}

impl From<EthAddress> for Address {
    fn from(addr: EthAddress) -> Self {
        addr.0
    }
}

/// Read-only contract call request
#[derive(Debug, Clone)]
pub struct EvmCallRequest {
    /// Target contract address
    pub to: EthAddress,
    /// Encoded function call
    pub data: Vec<u8>,
}

impl EvmCallRequest {
    /// Create a new call request
    pub fn new(to: EthAddress, data: Vec<u8>) -> Self {
        Self { to, data }
    }
}
