/// EVM chain plumbing
///
/// Provider wrapper, typed contract calls via the Alloy `sol!` stack, and
/// EIP-1559 transaction construction. Everything chain-facing in the crate
/// goes through [`client::EvmClient`].
pub mod client;
pub mod tx;
pub mod types;

pub use client::EvmClient;
pub use tx::{Eip1559Transaction, SignedEip1559Transaction};
pub use types::{EthAddress, EvmCallRequest};
