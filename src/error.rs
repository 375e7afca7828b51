use thiserror::Error;

/// Errors produced by the whitelist SDK
#[derive(Debug, Error)]
pub enum Error {
    /// The provider is attached to a different chain than the one the
    /// contract is deployed on. Carries both ids so callers can render a
    /// blocking notice before aborting.
    #[error("network mismatch: connected to chain {actual}, expected chain {expected}")]
    NetworkMismatch { expected: u64, actual: u64 },

    /// The wallet connector declined the connection attempt
    #[error("wallet connection rejected: {0}")]
    UserRejected(String),

    /// A read-only contract call failed or returned a malformed response
    #[error("contract read failed: {0}")]
    ContractRead(String),

    /// The chain rejected a submitted transaction
    #[error("transaction reverted: {0}")]
    TransactionReverted(String),

    /// RPC transport error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Wallet error
    #[error("wallet error: {0}")]
    Wallet(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error must be surfaced to the user as a blocking
    /// notice rather than only written to the diagnostic log.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Error::NetworkMismatch { .. })
    }
}
