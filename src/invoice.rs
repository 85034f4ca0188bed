use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use teloxide::utils::html;

use crate::entity::{TransactionRecord, TransactionStatus, TransactionType};
use crate::qrcodeutils::{convert_svg_to_png, qr_path_data};

const WIDTH: u32 = 600;
const HEIGHT: u32 = 820;
const QR_SIZE: u32 = 180;

/// Everything printed on a receipt
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceData {
    pub transaction_hash: String,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub tx_type: TransactionType,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl From<&TransactionRecord> for InvoiceData {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            transaction_hash: record.hash.clone(),
            from: record.from.clone(),
            to: record.to.clone(),
            amount: record.amount,
            tx_type: record.tx_type,
            timestamp: record.timestamp,
            status: record.status,
        }
    }
}

fn status_color(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Confirmed => "#16a34a",
        TransactionStatus::Pending => "#d97706",
        TransactionStatus::Failed => "#dc2626",
    }
}

fn type_label(tx_type: TransactionType) -> &'static str {
    match tx_type {
        TransactionType::Sent => "Payment sent",
        TransactionType::Received => "Payment received",
        TransactionType::Other => "Transaction",
    }
}

/// Long values are split across lines so they stay inside the card
fn wrap(text: &str, width: usize) -> Vec<String> {
    text.chars()
        .collect::<Vec<_>>()
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn field(svg: &mut String, y: &mut u32, label: &str, value: &str) {
    svg.push_str(&format!(
        r##"<text x="48" y="{}" font-family="sans-serif" font-size="13" fill="#6b7280">{}</text>"##,
        *y,
        html::escape(label)
    ));
    *y += 20;
    for line in wrap(value, 44) {
        svg.push_str(&format!(
            r##"<text x="48" y="{}" font-family="monospace" font-size="15" fill="#111827">{}</text>"##,
            *y,
            html::escape(&line)
        ));
        *y += 20;
    }
    *y += 12;
}

/// Fixed-layout receipt. The output depends only on `data`.
pub fn render_invoice_svg(data: &InvoiceData) -> Result<String> {
    let (qr_path, qr_modules) = qr_path_data(&data.transaction_hash)?;
    // one quiet module on each side
    let scale = QR_SIZE as f64 / (qr_modules + 2) as f64;
    let qr_x = (WIDTH - QR_SIZE) / 2;
    let qr_y = HEIGHT - QR_SIZE - 70;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str(r##"<rect width="100%" height="100%" fill="#f3f4f6"/>"##);
    svg.push_str(&format!(
        r##"<rect x="24" y="24" width="{}" height="{}" rx="16" fill="#ffffff"/>"##,
        WIDTH - 48,
        HEIGHT - 48
    ));

    // header
    svg.push_str(&format!(
        r##"<rect x="24" y="24" width="{}" height="96" rx="16" fill="#1a1f71"/>"##,
        WIDTH - 48
    ));
    svg.push_str(r##"<text x="48" y="66" font-family="sans-serif" font-size="24" font-weight="bold" fill="#ffffff">Cryptal Super Wallet</text>"##);
    svg.push_str(r##"<text x="48" y="96" font-family="sans-serif" font-size="14" fill="#c7d2fe">Transaction receipt</text>"##);

    // amount and status badge
    svg.push_str(&format!(
        r##"<text x="48" y="170" font-family="sans-serif" font-size="14" fill="#6b7280">{}</text>"##,
        type_label(data.tx_type)
    ));
    svg.push_str(&format!(
        r##"<text x="48" y="210" font-family="sans-serif" font-size="34" font-weight="bold" fill="#111827">{} APT</text>"##,
        html::escape(&data.amount.normalize().to_string())
    ));
    svg.push_str(&format!(
        r##"<rect x="{}" y="150" width="120" height="32" rx="16" fill="{}"/>"##,
        WIDTH - 48 - 120,
        status_color(data.status)
    ));
    svg.push_str(&format!(
        r##"<text x="{}" y="171" font-family="sans-serif" font-size="14" font-weight="bold" fill="#ffffff" text-anchor="middle">{}</text>"##,
        WIDTH - 48 - 60,
        data.status.to_string().to_uppercase()
    ));

    let mut y = 260;
    field(
        &mut svg,
        &mut y,
        "Date",
        &data.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    field(&mut svg, &mut y, "From", &data.from);
    field(&mut svg, &mut y, "To", &data.to);
    field(&mut svg, &mut y, "Transaction hash", &data.transaction_hash);

    svg.push_str(&format!(
        r##"<rect x="{}" y="{}" width="{s}" height="{s}" fill="#ffffff"/>"##,
        qr_x,
        qr_y,
        s = QR_SIZE
    ));
    svg.push_str(&format!(
        r##"<path transform="translate({:.3} {:.3}) scale({:.5})" fill="#000000" d="{}"/>"##,
        qr_x as f64 + scale,
        qr_y as f64 + scale,
        scale,
        qr_path
    ));
    svg.push_str(&format!(
        r##"<text x="{}" y="{}" font-family="sans-serif" font-size="12" fill="#9ca3af" text-anchor="middle">Scan for the transaction hash</text>"##,
        WIDTH / 2,
        HEIGHT - 46
    ));
    svg.push_str("</svg>");

    Ok(svg)
}

pub fn render_invoice_png(data: &InvoiceData) -> Result<Vec<u8>> {
    let svg = render_invoice_svg(data)?;
    convert_svg_to_png(svg.as_bytes())
}

/// `data:image/png;base64,...`
pub fn render_invoice_data_url(data: &InvoiceData) -> Result<String> {
    let png = render_invoice_png(data)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn sample() -> InvoiceData {
        InvoiceData {
            transaction_hash: format!("0x{}", "ab".repeat(32)),
            from: "0x1".to_string(),
            to: "<script>&\"".to_string(),
            amount: Decimal::from_str("1.50").unwrap(),
            tx_type: TransactionType::Sent,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            status: TransactionStatus::Confirmed,
        }
    }

    #[test]
    fn svg_escapes_user_text() {
        let svg = render_invoice_svg(&sample()).unwrap();
        assert!(svg.contains("&lt;script&gt;&amp;"));
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("1.5 APT"));
        assert!(svg.contains("CONFIRMED"));
        assert!(svg.contains("2024-05-01 12:30:00 UTC"));
    }

    #[test]
    fn long_values_wrap() {
        let lines = wrap(&"a".repeat(66), 44);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 44);
        assert_eq!(lines[1].len(), 22);
    }

    #[test]
    fn png_is_deterministic() {
        let first = render_invoice_png(&sample()).unwrap();
        let second = render_invoice_png(&sample()).unwrap();
        assert_eq!(&first[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(first, second);
    }

    #[test]
    fn data_url_has_png_prefix() {
        let url = render_invoice_data_url(&sample()).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBOR"));
    }
}
