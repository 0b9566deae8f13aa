//! Private key handling
//!
//! SECURITY: This is the ONLY place where private keys exist.
//! - Keys are held in alloy's PrivateKeySigner which handles crypto securely
//! - Keys are never serialized and never logged
//! - Signing happens through the EthereumWallet handle, nothing else

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::error::{Error, Result};

/// Holds the account key and exposes only its derived address and a signing
/// handle. No `Serialize` impl, and `Debug` redacts the key.
pub struct KeySigner {
    signer: PrivateKeySigner,
    address: Address,
    wallet: EthereumWallet,
}

impl KeySigner {
    /// Create a signer from a hex-encoded private key. A `0x` prefix is
    /// accepted and stripped.
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::InvalidKey(format!("{e}")))?;

        Ok(Self::from_signer(signer))
    }

    /// Create a signer from an environment variable containing a hex key.
    ///
    /// # Security
    /// Consider a secrets manager in production; environment variables leak
    /// into process listings and core dumps.
    pub fn from_env(var_name: &str) -> Result<Self> {
        let key_hex = std::env::var(var_name).map_err(|_| {
            Error::InvalidKey(format!(
                "environment variable {var_name} not set; required for wallet initialization"
            ))
        })?;

        Self::from_hex(&key_hex)
    }

    /// Generate a fresh random key, for an all-new account.
    pub fn random() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        let wallet = EthereumWallet::from(signer.clone());
        Self {
            signer,
            address,
            wallet,
        }
    }

    /// The public address (safe to share).
    pub fn address(&self) -> Address {
        self.address
    }

    /// The address as a checksummed string.
    pub fn address_string(&self) -> String {
        self.address.to_string()
    }

    /// Signing handle for building transactions. Exposes signing operations
    /// only, never the raw key.
    pub fn wallet(&self) -> &EthereumWallet {
        &self.wallet
    }
}

impl std::fmt::Debug for KeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySigner")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}

impl Clone for KeySigner {
    fn clone(&self) -> Self {
        Self::from_signer(self.signer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known anvil dev key (DO NOT use in production!)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn derives_address_from_hex_key() {
        let signer = KeySigner::from_hex(TEST_KEY).unwrap();
        assert_eq!(
            signer.address_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn prefix_is_optional() {
        let with_prefix = KeySigner::from_hex(TEST_KEY).unwrap();
        let without_prefix = KeySigner::from_hex(&TEST_KEY[2..]).unwrap();
        assert_eq!(with_prefix.address(), without_prefix.address());
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(matches!(
            KeySigner::from_hex("0xnot-a-key"),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            KeySigner::from_hex("0x1234"),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn random_signers_get_distinct_addresses() {
        assert_ne!(KeySigner::random().address(), KeySigner::random().address());
    }

    #[test]
    fn debug_redacts_key_material() {
        let signer = KeySigner::from_hex(TEST_KEY).unwrap();
        let debug_str = format!("{:?}", signer);
        assert!(!debug_str.contains("ac0974bec"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
