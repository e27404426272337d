//! Display helpers for amounts in whole rupiah.

/// Formats an amount as rupiah with dot thousand separators, e.g.
/// `Rp 1.250.000`.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {grouped}")
}

/// Shipping cost, with free shipping spelled out.
pub fn format_shipping(amount: u64) -> String {
    if amount == 0 {
        "Gratis".to_string()
    } else {
        format_rupiah(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_amounts_have_no_separator() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(950), "Rp 950");
    }

    #[test]
    fn test_thousands_are_grouped() {
        assert_eq!(format_rupiah(20_000), "Rp 20.000");
        assert_eq!(format_rupiah(125_000), "Rp 125.000");
        assert_eq!(format_rupiah(1_250_000), "Rp 1.250.000");
    }

    #[test]
    fn test_free_shipping_label() {
        assert_eq!(format_shipping(0), "Gratis");
        assert_eq!(format_shipping(20_000), "Rp 20.000");
    }
}
