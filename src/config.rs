//! Configuration management for the whitelist SDK
//!
//! Configuration is layered: built-in constants for the known network, an
//! optional config file, then `WHITELIST_*` environment variables (with
//! dotenv support). The contract address has no built-in default and must
//! be supplied by file or environment.

use config::{Config as ConfigLoader, ConfigError, File};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::str::FromStr;

use crate::error::Error;
use crate::evm::types::EthAddress;

/// Environment variable names
pub const ENV_NETWORK: &str = "WHITELIST_NETWORK";
pub const ENV_CHAIN_ID: &str = "WHITELIST_CHAIN_ID";
pub const ENV_RPC_URL: &str = "WHITELIST_RPC_URL";
pub const ENV_CONTRACT_ADDRESS: &str = "WHITELIST_CONTRACT_ADDRESS";
pub const ENV_MNEMONIC: &str = "WHITELIST_MNEMONIC";
pub const ENV_ACCOUNT_INDEX: &str = "WHITELIST_ACCOUNT_INDEX";
pub const ENV_CONFIG_DIR: &str = "WHITELIST_CONFIG_DIR";

/// Per-network constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConstants {
    /// Network name
    pub network_name: String,
    /// Chain ID the contract is deployed on; connections to any other
    /// chain are refused
    pub chain_id: u64,
    /// Default RPC endpoint
    pub default_rpc: String,
}

impl NetworkConstants {
    /// Load network constants from the configuration file
    pub fn load(network: &str) -> Result<Self, ConfigError> {
        let config_dir =
            std_env::var(ENV_CONFIG_DIR).unwrap_or_else(|_| "config".to_string());

        let mut config_paths = vec![
            format!("{}/network", config_dir),
            "config/network".to_string(),
        ];
        if let Some(user_dir) = dirs::config_dir() {
            config_paths.push(format!("{}/whitelist/network", user_dir.display()));
        }

        for config_path in &config_paths {
            if let Ok(settings) = ConfigLoader::builder()
                .add_source(File::with_name(config_path))
                .build()
            {
                if let Ok(constants) = settings.get::<NetworkConstants>(network) {
                    return Ok(constants);
                }
            }
        }

        // Hardcoded fallback for the known network
        match network {
            "rinkeby" => Ok(Self::default_rinkeby()),
            _ => Err(ConfigError::NotFound(format!(
                "network constants for '{}'",
                network
            ))),
        }
    }

    /// Constants for the legacy Rinkeby test network, where the whitelist
    /// contract lives
    pub fn default_rinkeby() -> Self {
        Self {
            network_name: "rinkeby".to_string(),
            chain_id: 4,
            default_rpc: "https://rpc.rinkeby.ethpool.dev".to_string(),
        }
    }
}

impl Default for NetworkConstants {
    fn default() -> Self {
        Self::default_rinkeby()
    }
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct WhitelistConfig {
    /// Network constants for the target chain
    pub network: NetworkConstants,
    /// RPC endpoint to use (network default unless overridden)
    pub rpc_url: String,
    /// Deployed whitelist contract address
    pub contract_address: EthAddress,
    /// HD account index for the wallet
    pub account_index: u32,
    /// Wallet mnemonic, if configured. Held as a secret and never logged.
    mnemonic: Option<SecretString>,
}

impl WhitelistConfig {
    /// Load configuration for the given network (defaults to the network
    /// named in the environment, then to Rinkeby)
    pub fn load(network: Option<&str>) -> Result<Self, Error> {
        let _ = dotenv::dotenv();

        let network_name = network
            .map(str::to_string)
            .or_else(|| std_env::var(ENV_NETWORK).ok())
            .unwrap_or_else(|| "rinkeby".to_string());

        let mut constants = NetworkConstants::load(&network_name)
            .map_err(|e| Error::Config(format!("failed to load network constants: {}", e)))?;

        if let Ok(chain_id) = std_env::var(ENV_CHAIN_ID) {
            constants.chain_id = chain_id
                .parse()
                .map_err(|e| Error::Config(format!("invalid {}: {}", ENV_CHAIN_ID, e)))?;
        }

        let rpc_url = std_env::var(ENV_RPC_URL).unwrap_or_else(|_| constants.default_rpc.clone());
        url::Url::parse(&rpc_url)
            .map_err(|e| Error::Config(format!("invalid RPC URL '{}': {}", rpc_url, e)))?;

        let contract_address = std_env::var(ENV_CONTRACT_ADDRESS)
            .map_err(|_| {
                Error::Config(format!(
                    "whitelist contract address not configured (set {})",
                    ENV_CONTRACT_ADDRESS
                ))
            })
            .and_then(|s| EthAddress::from_str(&s))?;

        let account_index = match std_env::var(ENV_ACCOUNT_INDEX) {
            Ok(idx) => idx
                .parse()
                .map_err(|e| Error::Config(format!("invalid {}: {}", ENV_ACCOUNT_INDEX, e)))?,
            Err(_) => 0,
        };

        let mnemonic = std_env::var(ENV_MNEMONIC).ok().map(SecretString::new);

        Ok(Self {
            network: constants,
            rpc_url,
            contract_address,
            account_index,
            mnemonic,
        })
    }

    /// Build a configuration directly, bypassing file and environment
    /// lookup. Primarily for embedding and tests.
    pub fn with_values(
        network: NetworkConstants,
        rpc_url: String,
        contract_address: EthAddress,
    ) -> Self {
        Self {
            network,
            rpc_url,
            contract_address,
            account_index: 0,
            mnemonic: None,
        }
    }

    /// Override the RPC endpoint
    pub fn set_rpc_url(&mut self, rpc_url: String) -> Result<(), Error> {
        url::Url::parse(&rpc_url)
            .map_err(|e| Error::Config(format!("invalid RPC URL '{}': {}", rpc_url, e)))?;
        self.rpc_url = rpc_url;
        Ok(())
    }

    /// Override the contract address
    pub fn set_contract_address(&mut self, address: EthAddress) {
        self.contract_address = address;
    }

    /// Set the wallet mnemonic
    pub fn set_mnemonic(&mut self, mnemonic: SecretString) {
        self.mnemonic = Some(mnemonic);
    }

    /// Wallet mnemonic, if any
    pub fn mnemonic(&self) -> Option<&SecretString> {
        self.mnemonic.as_ref()
    }

    /// Chain ID the provider must report
    pub fn required_chain_id(&self) -> u64 {
        self.network.chain_id
    }
}
