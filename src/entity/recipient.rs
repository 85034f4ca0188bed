use lazy_static::lazy_static;
use regex::Regex;

use crate::aptos::utils::normalize_address;
use crate::entity::BotError;

/// How a recipient string was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipientKind {
    Address,
    WalletId,
    UpiId,
}

impl std::fmt::Display for RecipientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipientKind::Address => write!(f, "address"),
            RecipientKind::WalletId => write!(f, "walletId"),
            RecipientKind::UpiId => write!(f, "upiId"),
        }
    }
}

/// A classified recipient, ready for lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientQuery {
    /// Already canonical (long form, lowercase)
    Address(String),
    WalletId(String),
    UpiId(String),
}

lazy_static! {
    static ref ADDRESS_RE: Regex = Regex::new(r"^0[xX][0-9a-fA-F]{1,64}$").unwrap();
    static ref WALLET_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9_.\-]{3,32}$").unwrap();
    static ref UPI_ID_RE: Regex =
        Regex::new(r"^[A-Za-z0-9_.\-]+@[A-Za-z0-9_.\-]+$").unwrap();
}

impl RecipientQuery {
    /// Classifies by shape: `0x` + up to 64 hex digits is an address, otherwise
    /// anything with `@` is a UPI-style id and everything else a wallet id.
    pub fn parse(input: &str) -> Result<Self, BotError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(BotError::InvalidRecipient("recipient is empty".to_string()));
        }

        // `0x` without a hex body is not an address; the other shapes still apply
        if ADDRESS_RE.is_match(input) {
            let address = normalize_address(input).map_err(|_| BotError::InvalidAddress)?;
            return Ok(RecipientQuery::Address(address));
        }

        if input.contains('@') {
            if UPI_ID_RE.is_match(input) {
                return Ok(RecipientQuery::UpiId(input.to_lowercase()));
            }
            return Err(BotError::InvalidRecipient(format!(
                "'{}' is not a valid UPI-style id (expected name@handle)",
                input
            )));
        }

        if WALLET_ID_RE.is_match(input) {
            return Ok(RecipientQuery::WalletId(input.to_lowercase()));
        }

        Err(BotError::InvalidWalletId(input.to_string()))
    }

    pub fn kind(&self) -> RecipientKind {
        match self {
            RecipientQuery::Address(_) => RecipientKind::Address,
            RecipientQuery::WalletId(_) => RecipientKind::WalletId,
            RecipientQuery::UpiId(_) => RecipientKind::UpiId,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            RecipientQuery::Address(value)
            | RecipientQuery::WalletId(value)
            | RecipientQuery::UpiId(value) => value,
        }
    }
}

/// Outcome of resolving a recipient. `NotFound` is a normal negative answer,
/// `LookupError` means the registry could not be asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found { address: String, kind: RecipientKind },
    NotFound { kind: RecipientKind },
    LookupError { kind: RecipientKind, reason: String },
}

impl Resolution {
    pub fn address(&self) -> Option<&str> {
        match self {
            Resolution::Found { address, .. } => Some(address),
            _ => None,
        }
    }

    pub fn kind(&self) -> RecipientKind {
        match self {
            Resolution::Found { kind, .. }
            | Resolution::NotFound { kind }
            | Resolution::LookupError { kind, .. } => *kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_prefixed_strings_are_addresses() {
        let query = RecipientQuery::parse("  0xABCDEF0123456789abcdef0123456789ABCDEF01 ").unwrap();
        assert_eq!(
            query,
            RecipientQuery::Address(format!(
                "0x{:0>64}",
                "abcdef0123456789abcdef0123456789abcdef01"
            ))
        );
    }

    #[test]
    fn short_addresses_are_padded() {
        let query = RecipientQuery::parse("0x1").unwrap();
        assert_eq!(query.value(), format!("0x{:0>64}", "1"));
    }

    #[test]
    fn non_hex_after_prefix_falls_through_to_ids() {
        assert_eq!(
            RecipientQuery::parse("0xshop@bank").unwrap(),
            RecipientQuery::UpiId("0xshop@bank".to_string())
        );
        assert_eq!(
            RecipientQuery::parse("0xMerchant").unwrap(),
            RecipientQuery::WalletId("0xmerchant".to_string())
        );
        let too_long = format!("0x{}", "a".repeat(65));
        assert!(matches!(
            RecipientQuery::parse(&too_long),
            Err(BotError::InvalidWalletId(_))
        ));
    }

    #[test]
    fn at_sign_means_upi_id() {
        let query = RecipientQuery::parse("Alice@cryptal").unwrap();
        assert_eq!(query, RecipientQuery::UpiId("alice@cryptal".to_string()));
        assert!(RecipientQuery::parse("alice@").is_err());
        assert!(RecipientQuery::parse("@cryptal").is_err());
    }

    #[test]
    fn other_strings_are_wallet_ids() {
        let query = RecipientQuery::parse("Bob_Store").unwrap();
        assert_eq!(query.kind(), RecipientKind::WalletId);
        assert_eq!(query.value(), "bob_store");
    }

    #[test]
    fn bad_wallet_ids_and_empty_input_fail() {
        assert!(matches!(
            RecipientQuery::parse("ab"),
            Err(BotError::InvalidWalletId(_))
        ));
        assert!(matches!(
            RecipientQuery::parse("has space"),
            Err(BotError::InvalidWalletId(_))
        ));
        assert!(matches!(
            RecipientQuery::parse("   "),
            Err(BotError::InvalidRecipient(_))
        ));
    }
}
