use anyhow::{anyhow, Result};

use crate::entity::TransactionRecord;

const HEADER: [&str; 7] = ["Date", "Type", "From", "To", "Amount (APT)", "Status", "Hash"];

/// Ledger as CSV, one row per record in the given order
pub fn transactions_to_csv(records: &[TransactionRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for record in records {
        writer.write_record([
            record.timestamp.to_rfc3339(),
            record.tx_type.to_string(),
            record.from.clone(),
            record.to.clone(),
            record.amount.normalize().to_string(),
            record.status.to_string(),
            record.hash.clone(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{TransactionStatus, TransactionType};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let records = vec![
            TransactionRecord::new(
                "0xa",
                "0xb",
                Decimal::from_str("2.50").unwrap(),
                TransactionType::Sent,
                "0x01",
                TransactionStatus::Confirmed,
            ),
            TransactionRecord::new(
                "0xc",
                "0xa",
                Decimal::from_str("0.1").unwrap(),
                TransactionType::Received,
                "0x02",
                TransactionStatus::Pending,
            ),
        ];

        let csv = String::from_utf8(transactions_to_csv(&records).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Date,Type,From,To,Amount (APT),Status,Hash");
        assert!(lines[1].ends_with(",sent,0xa,0xb,2.5,confirmed,0x01"));
        assert!(lines[2].ends_with(",received,0xc,0xa,0.1,pending,0x02"));
    }

    #[test]
    fn empty_ledger_is_header_only() {
        let csv = String::from_utf8(transactions_to_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
