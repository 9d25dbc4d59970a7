/// Whole-number amounts with thousands separators: `1250` -> `"1,250"`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Compact counters for stat tiles: `12_400` -> `"12K"`.
pub fn format_compact(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 10_000 {
        format!("{:.0}K", n as f64 / 1_000.0)
    } else {
        format_number(n)
    }
}

/// Prices keep cents only when there are any.
pub fn format_price(amount: f64, currency: &str) -> String {
    let amount = amount.max(0.0);
    let whole = amount.trunc() as u64;
    let cents = ((amount - amount.trunc()) * 100.0).round() as u64;
    let number = match cents {
        0 => format_number(whole),
        100 => format_number(whole + 1),
        c => format!("{}.{c:02}", format_number(whole)),
    };
    if currency.is_empty() {
        number
    } else {
        format!("{number} {currency}")
    }
}

pub fn format_price_range(min: Option<f64>, max: Option<f64>, currency: &str) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) if lo < hi => {
            format!("{} - {}", format_price(lo, ""), format_price(hi, currency))
        }
        (Some(p), _) | (None, Some(p)) => format_price(p, currency),
        (None, None) => "Price on request".to_string(),
    }
}

/// Date part of an ISO-8601 timestamp.
pub fn format_date(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Long transaction hashes shortened for table cells.
pub fn shorten_hash(hash: &str) -> String {
    if hash.len() <= 16 || !hash.is_ascii() {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..10], &hash[hash.len() - 6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_250), "1,250");
        assert_eq!(format_number(12_345_678), "12,345,678");
    }

    #[test]
    fn compact_counters() {
        assert_eq!(format_compact(9_999), "9,999");
        assert_eq!(format_compact(12_400), "12K");
        assert_eq!(format_compact(2_500_000), "2.5M");
    }

    #[test]
    fn prices() {
        assert_eq!(format_price(1200.0, "EUR"), "1,200 EUR");
        assert_eq!(format_price(99.5, "USDT"), "99.50 USDT");
        assert_eq!(format_price(19.999, ""), "20");
        assert_eq!(format_price_range(Some(300.0), Some(450.0), "GBP"), "300 - 450 GBP");
        assert_eq!(format_price_range(Some(300.0), Some(300.0), "GBP"), "300 GBP");
        assert_eq!(format_price_range(None, None, "GBP"), "Price on request");
    }

    #[test]
    fn dates_and_hashes() {
        assert_eq!(format_date("2024-03-01T10:00:00Z"), "2024-03-01");
        assert_eq!(format_date("2024-03-01"), "2024-03-01");

        let hash = format!("0x{}", "ab".repeat(32));
        assert_eq!(shorten_hash(&hash), "0xabababab...ababab");
        assert_eq!(shorten_hash("0x1234"), "0x1234");
    }
}
