// Allow deprecated Signature for compatibility with alloy-consensus ecosystem
#![allow(deprecated)]

use alloy_primitives::{Address, Signature, B256};
use bip32::DerivationPath;
use bip39::Mnemonic;
use k256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};
use sha3::{digest::FixedOutput, Digest, Keccak256};
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};
use zeroize::Zeroize;

use crate::error::Error;
use crate::evm::tx::{Eip1559Transaction, SignedEip1559Transaction};

// Wallet connector, the single entry point for obtaining signing capability
pub mod connector;
pub use connector::WalletConnector;

/// HD path prefix for Ethereum accounts (BIP-44)
const HD_PATH_PREFIX: &str = "m/44'/60'/0'/0/";

/// Local wallet holding the signing key for the connected address
pub struct EthWallet {
    /// Local secp256k1 signer
    signer: SigningKey,
    /// HD account index the key was derived at
    account_index: u32,
}

// Note: EthWallet intentionally does not implement Clone for security reasons
// The signing key should not be easily duplicated

impl std::fmt::Debug for EthWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthWallet")
            .field("account_index", &self.account_index)
            .field(
                "public_key",
                &hex::encode(self.signer.verifying_key().to_encoded_point(true).as_bytes()),
            )
            .finish()
    }
}

/// Wallet info that can be serialized safely
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    /// The wallet address
    pub address: String,
    /// The compressed public key as hex
    pub public_key: String,
}

impl EthWallet {
    /// Create a wallet from a mnemonic at the given account index
    pub fn from_mnemonic(mnemonic: &str, account_index: u32) -> Result<Self, Error> {
        let mnemonic = Mnemonic::from_str(mnemonic)
            .map_err(|e| Error::Wallet(format!("invalid mnemonic: {}", e)))?;

        let seed = mnemonic.to_seed("");
        let seed = bip32::Seed::new(seed);

        let path = format!("{}{}", HD_PATH_PREFIX, account_index);
        let path = DerivationPath::from_str(&path)
            .map_err(|e| Error::Wallet(format!("invalid derivation path: {}", e)))?;

        let derived_key = bip32::XPrv::derive_from_path(seed.as_bytes(), &path)
            .map_err(|e| Error::Wallet(format!("key derivation error: {}", e)))?;

        let mut derived_key_bytes = derived_key.to_bytes();
        let signer = SigningKey::from_slice(&derived_key_bytes)
            .map_err(|e| Error::Wallet(format!("failed to create signing key: {}", e)))?;
        derived_key_bytes.zeroize();

        Ok(Self {
            signer,
            account_index,
        })
    }

    /// Generate a new random wallet, returning it with its mnemonic phrase
    pub fn generate() -> Result<(Self, String), Error> {
        use rand::{thread_rng, RngCore};

        // 16 bytes (128 bits) of entropy for a 12-word mnemonic
        let mut entropy = [0u8; 16];
        thread_rng().fill_bytes(&mut entropy);

        let mnemonic = Mnemonic::from_entropy(&entropy)
            .map_err(|e| Error::Wallet(format!("failed to generate mnemonic: {}", e)))?;

        let phrase = mnemonic.to_string();
        let wallet = Self::from_mnemonic(&phrase, 0)?;

        Ok((wallet, phrase))
    }

    /// Ethereum address of this wallet
    ///
    /// Keccak-256 hash of the uncompressed public key (without the 0x04
    /// prefix), last 20 bytes.
    pub fn address(&self) -> Result<Address, Error> {
        let verifying_key = self.signer.verifying_key();
        let point = verifying_key.to_encoded_point(false);
        let pubkey_bytes = point.as_bytes();

        if pubkey_bytes.len() != 65 || pubkey_bytes[0] != 0x04 {
            return Err(Error::Wallet(
                "invalid public key format for address derivation".to_string(),
            ));
        }

        let mut hasher = Keccak::v256();
        hasher.update(&pubkey_bytes[1..]);
        let mut hash = [0u8; 32];
        hasher.finalize(&mut hash);

        let mut address_bytes = [0u8; 20];
        address_bytes.copy_from_slice(&hash[12..]);

        Ok(Address::from(address_bytes))
    }

    /// HD account index the key was derived at
    pub fn account_index(&self) -> u32 {
        self.account_index
    }

    /// Get wallet info
    pub fn info(&self) -> Result<WalletInfo, Error> {
        Ok(WalletInfo {
            address: format!("{:?}", self.address()?),
            public_key: hex::encode(self.signer.verifying_key().to_encoded_point(true).as_bytes()),
        })
    }

    fn sign_with_keccak<F>(&self, builder: F) -> Result<(Signature, B256), Error>
    where
        F: FnOnce(&mut Keccak256),
    {
        let mut digest = Keccak256::new();
        builder(&mut digest);

        let hash_bytes: [u8; 32] = digest.clone().finalize_fixed().into();

        let (sig, recid) = self
            .signer
            .sign_digest_recoverable(digest)
            .map_err(|e| Error::Wallet(format!("failed to sign digest: {}", e)))?;

        let signature = Signature::from((sig, recid));
        Ok((signature, B256::from(hash_bytes)))
    }

    /// Sign an EIP-1559 transaction and return the full signed payload
    pub fn sign_eip1559(&self, tx: &Eip1559Transaction) -> Result<SignedEip1559Transaction, Error> {
        let encoded = tx.encoded_for_signing();
        let (signature, _) = self.sign_with_keccak(|d| d.update(&encoded))?;
        let signed = tx.clone().into_signed(signature);
        let raw = tx.encode_signed(signed.signature());
        Ok(SignedEip1559Transaction::new(signed, raw))
    }
}
