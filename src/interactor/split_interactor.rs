use crate::aptos::{apt_to_octas, octas_to_apt};
use crate::entity::{BotError, Resolution};
use crate::interactor::resolver::RecipientResolver;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

pub const MAX_SPLIT_PARTICIPANTS: usize = 20;

/// One line of a split-bill breakdown
#[derive(Debug)]
pub struct SplitShare {
    pub input: String,
    pub resolution: Result<Resolution, BotError>,
    pub amount: Decimal,
}

impl SplitShare {
    pub fn address(&self) -> Option<&str> {
        self.resolution.as_ref().ok().and_then(Resolution::address)
    }
}

#[derive(Debug)]
pub struct SplitPlan {
    pub total: Decimal,
    pub shares: Vec<SplitShare>,
}

impl SplitPlan {
    /// Every participant resolved to an address
    pub fn is_complete(&self) -> bool {
        self.shares.iter().all(|share| share.address().is_some())
    }
}

/// Splits `total` into `parts` equal octa amounts; the remainder goes to the
/// first part so the shares always add up to `total`.
pub fn split_equally(total: Decimal, parts: usize) -> Result<Vec<Decimal>, BotError> {
    if parts == 0 {
        return Err(BotError::InvalidRecipient("no participants".to_string()));
    }

    let octas = apt_to_octas(total)?;
    let parts_u64 = parts as u64;
    if octas < parts_u64 {
        return Err(BotError::InvalidAmount);
    }

    let share = octas / parts_u64;
    let remainder = octas % parts_u64;

    Ok((0..parts)
        .map(|i| {
            if i == 0 {
                octas_to_apt(share + remainder)
            } else {
                octas_to_apt(share)
            }
        })
        .collect())
}

/// Participants separated by commas, spaces or new lines; duplicates dropped
pub fn parse_participants(text: &str) -> Result<Vec<String>, BotError> {
    let mut participants: Vec<String> = Vec::new();
    for part in text.split(|c: char| c == ',' || c == ';' || c.is_whitespace()) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !participants
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(part))
        {
            participants.push(part.to_string());
        }
    }

    if participants.is_empty() {
        return Err(BotError::InvalidRecipient(text.trim().to_string()));
    }
    if participants.len() > MAX_SPLIT_PARTICIPANTS {
        return Err(BotError::InvalidRecipient(format!(
            "at most {} participants",
            MAX_SPLIT_PARTICIPANTS
        )));
    }
    Ok(participants)
}

#[async_trait]
pub trait SplitInteractor: Send + Sync {
    async fn parse_participants(&self, text: &str) -> Result<Vec<String>, BotError>;
    async fn plan_split(
        &self,
        participants: &[String],
        total: Decimal,
    ) -> Result<SplitPlan, BotError>;
}

pub struct SplitInteractorImpl {
    resolver: Arc<RecipientResolver>,
}

impl SplitInteractorImpl {
    pub fn new(resolver: Arc<RecipientResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl SplitInteractor for SplitInteractorImpl {
    async fn parse_participants(&self, text: &str) -> Result<Vec<String>, BotError> {
        parse_participants(text)
    }

    async fn plan_split(
        &self,
        participants: &[String],
        total: Decimal,
    ) -> Result<SplitPlan, BotError> {
        let amounts = split_equally(total, participants.len())?;
        let resolutions = self.resolver.resolve_many(participants).await;

        let shares = participants
            .iter()
            .zip(resolutions)
            .zip(amounts)
            .map(|((input, resolution), amount)| SplitShare {
                input: input.clone(),
                resolution,
                amount,
            })
            .collect();

        Ok(SplitPlan { total, shares })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn shares_add_up_with_remainder_on_first() {
        let total = Decimal::from_str("0.00000010").unwrap();
        let shares = split_equally(total, 3).unwrap();

        assert_eq!(shares[0], Decimal::from_str("0.00000004").unwrap());
        assert_eq!(shares[1], Decimal::from_str("0.00000003").unwrap());
        assert_eq!(shares[2], Decimal::from_str("0.00000003").unwrap());
        assert_eq!(shares.iter().sum::<Decimal>(), total);
    }

    #[test]
    fn even_split() {
        let shares = split_equally(Decimal::from(3), 3).unwrap();
        assert!(shares.iter().all(|share| *share == Decimal::ONE));
    }

    #[test]
    fn amount_smaller_than_one_octa_per_person_is_rejected() {
        let total = Decimal::from_str("0.00000002").unwrap();
        assert!(matches!(split_equally(total, 3), Err(BotError::InvalidAmount)));
        assert!(split_equally(Decimal::ONE, 0).is_err());
    }

    #[test]
    fn participants_are_split_and_deduplicated() {
        let parsed = parse_participants("alice, bob\nALICE;  0x1").unwrap();
        assert_eq!(parsed, vec!["alice", "bob", "0x1"]);
        assert!(parse_participants(" ,, ").is_err());
    }
}
