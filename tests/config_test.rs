/// Configuration layering tests
use std::fs;
use std::str::FromStr;

use whitelist_sdk::evm::EthAddress;
use whitelist_sdk::{config, NetworkConstants, WhitelistConfig};

const CONTRACT: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

#[test]
fn builtin_network_targets_rinkeby() {
    let constants = NetworkConstants::default_rinkeby();
    assert_eq!(constants.network_name, "rinkeby");
    assert_eq!(constants.chain_id, 4);
    assert!(constants.default_rpc.starts_with("https://"));
}

#[test]
fn explicit_values_bypass_environment() {
    let config = WhitelistConfig::with_values(
        NetworkConstants::default_rinkeby(),
        "https://example.org/rpc".to_string(),
        EthAddress::from_str(CONTRACT).unwrap(),
    );
    assert_eq!(config.required_chain_id(), 4);
    assert_eq!(config.rpc_url, "https://example.org/rpc");
    assert!(config.mnemonic().is_none());
}

#[test]
fn rpc_override_rejects_malformed_urls() {
    let mut config = WhitelistConfig::with_values(
        NetworkConstants::default_rinkeby(),
        "https://example.org/rpc".to_string(),
        EthAddress::from_str(CONTRACT).unwrap(),
    );
    assert!(config.set_rpc_url("not a url".to_string()).is_err());
    assert!(config.set_rpc_url("https://other.example/rpc".to_string()).is_ok());
    assert_eq!(config.rpc_url, "https://other.example/rpc");
}

/// All environment-dependent assertions live in one test so the process
/// environment is only mutated from a single place.
#[test]
fn environment_and_file_layering() {
    // Without a contract address configured, loading fails
    std::env::remove_var(config::ENV_NETWORK);
    std::env::remove_var(config::ENV_CHAIN_ID);
    std::env::remove_var(config::ENV_RPC_URL);
    std::env::remove_var(config::ENV_CONTRACT_ADDRESS);
    std::env::remove_var(config::ENV_MNEMONIC);
    std::env::remove_var(config::ENV_ACCOUNT_INDEX);
    std::env::remove_var(config::ENV_CONFIG_DIR);
    assert!(WhitelistConfig::load(None).is_err());

    // Environment supplies the contract and overrides network settings
    std::env::set_var(config::ENV_CONTRACT_ADDRESS, CONTRACT);
    std::env::set_var(config::ENV_RPC_URL, "https://node.example/rpc");
    std::env::set_var(config::ENV_ACCOUNT_INDEX, "2");
    std::env::set_var(config::ENV_MNEMONIC, "abandon abandon about");

    let loaded = WhitelistConfig::load(None).unwrap();
    assert_eq!(loaded.required_chain_id(), 4);
    assert_eq!(loaded.rpc_url, "https://node.example/rpc");
    assert_eq!(
        loaded.contract_address,
        EthAddress::from_str(CONTRACT).unwrap()
    );
    assert_eq!(loaded.account_index, 2);
    assert!(loaded.mnemonic().is_some());

    // Chain id override applies on top of the network constants
    std::env::set_var(config::ENV_CHAIN_ID, "1337");
    let loaded = WhitelistConfig::load(None).unwrap();
    assert_eq!(loaded.required_chain_id(), 1337);
    std::env::remove_var(config::ENV_CHAIN_ID);

    // A malformed contract address is rejected at the boundary
    std::env::set_var(config::ENV_CONTRACT_ADDRESS, "0x1234");
    assert!(WhitelistConfig::load(None).is_err());
    std::env::set_var(config::ENV_CONTRACT_ADDRESS, CONTRACT);

    // Network constants resolve from a config file when one exists
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("network.toml"),
        r#"
[goerli]
network_name = "goerli"
chain_id = 5
default_rpc = "https://goerli.example/rpc"
"#,
    )
    .unwrap();
    std::env::set_var(config::ENV_CONFIG_DIR, dir.path());
    std::env::remove_var(config::ENV_RPC_URL);

    let constants = NetworkConstants::load("goerli").unwrap();
    assert_eq!(constants.chain_id, 5);

    let loaded = WhitelistConfig::load(Some("goerli")).unwrap();
    assert_eq!(loaded.required_chain_id(), 5);
    assert_eq!(loaded.rpc_url, "https://goerli.example/rpc");

    // Unknown networks still fail
    assert!(NetworkConstants::load("sepolia").is_err());

    std::env::remove_var(config::ENV_CONFIG_DIR);
    std::env::remove_var(config::ENV_CONTRACT_ADDRESS);
    std::env::remove_var(config::ENV_ACCOUNT_INDEX);
    std::env::remove_var(config::ENV_MNEMONIC);
}
