//! Key loading, generation and raw digest signing.
//!
//! # Security
//! - Private keys come from hex strings or the `LEDGER_PRIVATE_KEY` environment variable
//! - Keys are never logged or serialized

use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::tx::types::{PubKey, TxError, TxResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "LEDGER_PRIVATE_KEY";

/// A secp256k1 private key able to sign transaction digests.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> TxResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| TxError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Wallet loaded");

        Ok(Self { signer })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `LEDGER_PRIVATE_KEY` from environment.
    pub fn from_env() -> TxResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            TxError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    /// Address derived from the public key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Uncompressed public key, as registered on accounts and candidates.
    pub fn pub_key(&self) -> TxResult<PubKey> {
        let point = self.signer.credential().verifying_key().to_encoded_point(false);
        PubKey::try_from(point.as_bytes())
    }

    /// Raw private key bytes, for export by key generation tooling.
    pub fn secret_bytes(&self) -> B256 {
        self.signer.to_bytes()
    }

    /// Sign a 32-byte digest, returning `r || s || v`.
    pub fn sign_hash(&self, hash: &B256) -> TxResult<[u8; 65]> {
        let signature = self
            .signer
            .sign_hash_sync(hash)
            .map_err(|e| TxError::Signing(e.to_string()))?;
        Ok(signature.as_bytes())
    }
}

/// Generate a key pair, returning the public key alongside the wallet.
pub fn generate_key() -> TxResult<(PubKey, Wallet)> {
    let wallet = Wallet::generate();
    Ok((wallet.pub_key()?, wallet))
}
