/// Contract interfaces and helpers
///
/// Type-safe wrappers over the deployed contracts, using the Alloy `sol!`
/// macro for ABI encoding and decoding.
pub mod whitelist;

pub use whitelist::{IWhitelist, JoinReceipt, WhitelistContract};
