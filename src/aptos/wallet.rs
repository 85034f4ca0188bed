use anyhow::{anyhow, Result};
use bip39::{Language, Mnemonic};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use hmac::{Hmac, Mac};
use rand::{rng, RngCore};
use sha2::Sha512;
use sha3::{Digest, Sha3_256};

use crate::entity::{BotError, WalletAccount};

type HmacSha512 = Hmac<Sha512>;

const HARDENED_OFFSET: u32 = 0x8000_0000;
const APTOS_COIN_TYPE: u32 = 637;
/// Authentication key scheme byte for single ed25519 keys
const ED25519_SCHEME: u8 = 0x00;

/// Generate a new 12-word mnemonic
pub fn generate_mnemonic() -> Result<Mnemonic> {
    // 16 bytes (128 bits) of entropy is a 12-word BIP39 phrase
    let mut entropy = [0u8; 16];
    rng().fill_bytes(&mut entropy);

    Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| anyhow!("Failed to create mnemonic: {}", e))
}

/// Parse a user-supplied phrase
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic, BotError> {
    let normalized = phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|_| BotError::InvalidMnemonic)
}

/// SLIP-0010 ed25519 derivation. Every segment is hardened.
/// Returns `(private_key, chain_code)`.
pub fn slip10_derive(seed: &[u8], path: &[u32]) -> Result<([u8; 32], [u8; 32])> {
    let mut mac = HmacSha512::new_from_slice(b"ed25519 seed")
        .map_err(|e| anyhow!("Failed to initialise HMAC: {}", e))?;
    mac.update(seed);
    let (mut key, mut chain_code) = split_hmac_output(&mac.finalize().into_bytes());

    for segment in path {
        let hardened = segment | HARDENED_OFFSET;

        let mut mac = HmacSha512::new_from_slice(&chain_code)
            .map_err(|e| anyhow!("Failed to initialise HMAC: {}", e))?;
        mac.update(&[0u8]);
        mac.update(&key);
        mac.update(&hardened.to_be_bytes());

        let (child_key, child_chain_code) = split_hmac_output(&mac.finalize().into_bytes());
        key = child_key;
        chain_code = child_chain_code;
    }

    Ok((key, chain_code))
}

fn split_hmac_output(output: &[u8]) -> ([u8; 32], [u8; 32]) {
    let mut key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    key.copy_from_slice(&output[..32]);
    chain_code.copy_from_slice(&output[32..64]);
    (key, chain_code)
}

/// Signing key at `m/44'/637'/{index}'/0'/0'`
pub fn derive_signing_key(mnemonic: &Mnemonic, index: u32) -> Result<SigningKey> {
    let seed = mnemonic.to_seed("");
    let (private_key, _) = slip10_derive(&seed, &[44, APTOS_COIN_TYPE, index, 0, 0])?;
    Ok(SigningKey::from_bytes(&private_key))
}

/// Aptos account address: SHA3-256(public key || scheme byte)
pub fn account_address(verifying_key: &VerifyingKey) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(verifying_key.to_bytes());
    hasher.update([ED25519_SCHEME]);
    format!("0x{}", hex::encode(hasher.finalize()))
}

/// Derive the account at `index`
pub fn derive_account(mnemonic: &Mnemonic, index: u32) -> Result<WalletAccount> {
    let signing_key = derive_signing_key(mnemonic, index)?;
    let verifying_key = signing_key.verifying_key();

    Ok(WalletAccount {
        address: account_address(&verifying_key),
        public_key: format!("0x{}", hex::encode(verifying_key.to_bytes())),
        private_key: format!("0x{}", hex::encode(signing_key.to_bytes())),
        derivation_index: index,
    })
}

/// Restore a signing key from its `0x`-prefixed hex form
pub fn signing_key_from_hex(private_key: &str) -> Result<SigningKey> {
    let bytes = hex::decode(private_key.trim_start_matches("0x"))
        .map_err(|e| anyhow!("Failed to decode private key: {}", e))?;

    let bytes: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("Invalid private key length: {}", bytes.len()))?;

    Ok(SigningKey::from_bytes(&bytes))
}

/// Sign `message` and return the signature as `0x`-prefixed hex
pub fn sign_message(signing_key: &SigningKey, message: &[u8]) -> String {
    let signature = signing_key.sign(message);
    format!("0x{}", hex::encode(signature.to_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn slip10_master_key_matches_reference_vector() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let (key, chain_code) = slip10_derive(&seed, &[]).unwrap();
        assert_eq!(
            hex::encode(key),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(chain_code),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
    }

    #[test]
    fn derivation_is_deterministic_per_index() {
        let mnemonic = parse_mnemonic(PHRASE).unwrap();
        let first = derive_account(&mnemonic, 0).unwrap();
        let again = derive_account(&mnemonic, 0).unwrap();
        let second = derive_account(&mnemonic, 1).unwrap();

        assert_eq!(first, again);
        assert_ne!(first.address, second.address);
        assert_eq!(first.address.len(), 66);
        assert_eq!(first.public_key.len(), 66);
        assert_eq!(second.derivation_index, 1);
    }

    #[test]
    fn mnemonic_parsing_tolerates_spacing_and_case() {
        let messy = format!("  {}  ", PHRASE.to_uppercase().replace(' ', "   "));
        assert!(parse_mnemonic(&messy).is_ok());
        assert!(matches!(
            parse_mnemonic("not a real phrase"),
            Err(BotError::InvalidMnemonic)
        ));
    }

    #[test]
    fn generated_mnemonic_has_twelve_words() {
        let mnemonic = generate_mnemonic().unwrap();
        assert_eq!(mnemonic.to_string().split(' ').count(), 12);
    }

    #[test]
    fn stored_private_key_signs_verifiably() {
        let mnemonic = parse_mnemonic(PHRASE).unwrap();
        let account = derive_account(&mnemonic, 0).unwrap();
        let key = signing_key_from_hex(&account.private_key).unwrap();

        let signature_hex = sign_message(&key, b"message");
        let bytes: [u8; 64] = hex::decode(signature_hex.trim_start_matches("0x"))
            .unwrap()
            .try_into()
            .unwrap();
        let signature = Signature::from_bytes(&bytes);
        assert!(key.verifying_key().verify(b"message", &signature).is_ok());
        assert_eq!(account_address(&key.verifying_key()), account.address);
    }
}
