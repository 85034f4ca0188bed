use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::entity::BotError;

// Constants for conversion
pub const APT_DECIMALS: u32 = 8;
pub const OCTAS_PER_APT: u64 = 100_000_000;

/// Convert octas to APT
pub fn octas_to_apt(octas: u64) -> Decimal {
    Decimal::from_i128_with_scale(octas as i128, APT_DECIMALS).normalize()
}

/// Convert APT to octas. Rejects non-positive amounts and more than 8 decimals.
pub fn apt_to_octas(amount: Decimal) -> Result<u64, BotError> {
    if amount <= Decimal::ZERO {
        return Err(BotError::InvalidAmount);
    }

    let octas = amount
        .checked_mul(Decimal::from(OCTAS_PER_APT))
        .ok_or(BotError::InvalidAmount)?;

    if !octas.fract().is_zero() {
        return Err(BotError::InvalidAmount);
    }

    octas.to_u64().ok_or(BotError::InvalidAmount)
}

/// Parse an amount typed by the user: `1.5`, `1.5 APT` or `0,25 apt`
pub fn parse_apt_amount(input: &str) -> Result<Decimal, BotError> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"(?i)^(\d+(?:[.,]\d+)?)\s*(?:apt)?$").unwrap();
    }

    let captures = RE.captures(input.trim()).ok_or(BotError::InvalidAmount)?;
    let number = captures
        .get(1)
        .ok_or(BotError::InvalidAmount)?
        .as_str()
        .replace(',', ".");

    let amount = Decimal::from_str(&number).map_err(|_| BotError::InvalidAmount)?;
    // validates precision and sign
    apt_to_octas(amount)?;
    Ok(amount.normalize())
}

/// Canonical long form: `0x` + 64 lowercase hex digits
pub fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex_part.is_empty() || hex_part.len() > 64 {
        return Err(anyhow!("Invalid Aptos address length: {}", address));
    }
    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(anyhow!("Invalid Aptos address: {}", address));
    }

    Ok(format!("0x{:0>64}", hex_part.to_lowercase()))
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 14 {
        return address.to_string();
    }

    let start = &address[..8];
    let end = &address[address.len() - 6..];

    format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octas_round_trip_through_apt() {
        assert_eq!(octas_to_apt(150_000_000), Decimal::from_str("1.5").unwrap());
        assert_eq!(apt_to_octas(Decimal::from_str("1.5").unwrap()).unwrap(), 150_000_000);
        assert_eq!(apt_to_octas(Decimal::from_str("0.00000001").unwrap()).unwrap(), 1);
    }

    #[test]
    fn sub_octa_precision_is_rejected() {
        assert!(apt_to_octas(Decimal::from_str("0.000000001").unwrap()).is_err());
        assert!(apt_to_octas(Decimal::ZERO).is_err());
        assert!(apt_to_octas(Decimal::from_str("-1").unwrap()).is_err());
    }

    #[test]
    fn amounts_parse_with_optional_unit() {
        assert_eq!(parse_apt_amount("2").unwrap(), Decimal::from(2));
        assert_eq!(parse_apt_amount("0.5 APT").unwrap(), Decimal::from_str("0.5").unwrap());
        assert_eq!(parse_apt_amount("0,25 apt").unwrap(), Decimal::from_str("0.25").unwrap());
        assert!(parse_apt_amount("abc").is_err());
        assert!(parse_apt_amount("1 SOL").is_err());
        assert!(parse_apt_amount("0").is_err());
    }

    #[test]
    fn addresses_normalize_to_long_form() {
        assert_eq!(normalize_address("0x1").unwrap(), format!("0x{:0>64}", "1"));
        assert_eq!(
            normalize_address("0XABC").unwrap(),
            format!("0x{:0>64}", "abc")
        );
        assert!(normalize_address("0x").is_err());
        assert!(normalize_address("0xzz").is_err());
    }

    #[test]
    fn short_addresses_are_not_shortened() {
        assert_eq!(shorten_address("0x1"), "0x1");
        let long = format!("0x{}", "a".repeat(64));
        assert_eq!(shorten_address(&long), "0xaaaaaa...aaaaaa");
    }
}
