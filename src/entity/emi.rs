use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recurring installment agreement between a company and a user.
/// Amounts are in octas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmiAgreement {
    pub id: u64,
    pub company: String,
    pub user: String,
    pub monthly_amount: u64,
    pub total_months: u64,
    pub months_paid: u64,
    pub next_due: Option<DateTime<Utc>>,
    pub description: String,
    pub active: bool,
}

impl EmiAgreement {
    pub fn progress_percent(&self) -> f64 {
        emi_progress_percent(self.months_paid, self.total_months)
    }

    pub fn remaining_months(&self) -> u64 {
        self.total_months.saturating_sub(self.months_paid)
    }

    pub fn remaining_amount(&self) -> u64 {
        self.monthly_amount.saturating_mul(self.remaining_months())
    }

    pub fn is_completed(&self) -> bool {
        self.months_paid >= self.total_months
    }

    /// Whether the company may collect an installment at `now`
    pub fn is_collectable(&self, now: DateTime<Utc>) -> bool {
        self.active
            && !self.is_completed()
            && self.next_due.map_or(true, |due| due <= now)
    }
}

/// `months_paid / total_months * 100`, clamped to `[0, 100]`
pub fn emi_progress_percent(months_paid: u64, total_months: u64) -> f64 {
    if total_months == 0 {
        return 0.0;
    }
    let percent = months_paid as f64 / total_months as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

/// Text progress bar used in chat views
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "▓".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn agreement(months_paid: u64, total_months: u64) -> EmiAgreement {
        EmiAgreement {
            id: 1,
            company: "0xc".to_string(),
            user: "0xu".to_string(),
            monthly_amount: 50_000_000,
            total_months,
            months_paid,
            next_due: None,
            description: "Laptop".to_string(),
            active: true,
        }
    }

    #[test]
    fn progress_matches_ratio() {
        assert_eq!(emi_progress_percent(0, 12), 0.0);
        assert_eq!(emi_progress_percent(3, 12), 25.0);
        assert_eq!(emi_progress_percent(12, 12), 100.0);
    }

    #[test]
    fn progress_is_clamped_and_safe_on_zero_months() {
        assert_eq!(emi_progress_percent(15, 12), 100.0);
        assert_eq!(emi_progress_percent(0, 0), 0.0);
    }

    #[test]
    fn remaining_amount_uses_unpaid_months() {
        let emi = agreement(4, 6);
        assert_eq!(emi.remaining_months(), 2);
        assert_eq!(emi.remaining_amount(), 100_000_000);
        assert!(!emi.is_completed());
    }

    #[test]
    fn collectable_only_when_due_and_active() {
        let now = Utc::now();
        let mut emi = agreement(1, 3);
        emi.next_due = Some(now + Duration::days(3));
        assert!(!emi.is_collectable(now));

        emi.next_due = Some(now - Duration::days(1));
        assert!(emi.is_collectable(now));

        emi.active = false;
        assert!(!emi.is_collectable(now));

        let done = agreement(3, 3);
        assert!(!done.is_collectable(now));
    }

    #[test]
    fn progress_bar_has_fixed_width() {
        assert_eq!(progress_bar(50.0, 10), "▓▓▓▓▓░░░░░");
        assert_eq!(progress_bar(150.0, 4), "▓▓▓▓");
    }
}
