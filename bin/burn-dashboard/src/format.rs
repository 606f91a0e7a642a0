//! Human formatting of token amounts, durations and USD values.
//!
//! Token amounts are 18-decimal fixed-point integers. An absent read formats
//! the same as zero.

use alloy::primitives::U256;

use crate::constants::TOKEN_DECIMALS;

/// `10^18`, one whole token in base units.
pub const ONE_TOKEN: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

const HALF_TOKEN: U256 = U256::from_limbs([500_000_000_000_000_000, 0, 0, 0]);

/// Converts a base-unit amount into whole tokens as a float.
///
/// Whole and fractional parts are converted separately so the fraction keeps
/// its precision for small amounts.
pub fn to_tokens(value: U256) -> f64 {
    debug_assert_eq!(TOKEN_DECIMALS, 18);
    let whole = (value / ONE_TOKEN).saturating_to::<u128>();
    let frac = (value % ONE_TOKEN).to::<u64>();
    whole as f64 + frac as f64 / 1e18
}

/// Short form: `"2.50M"`, `"1.5K"`, `"42"`. Absent or zero is `"0"`.
pub fn format_amount(value: Option<U256>) -> String {
    let Some(value) = value.filter(|v| !v.is_zero()) else {
        return "0".to_string();
    };
    let tokens = to_tokens(value);
    if tokens >= 1_000_000.0 {
        format!("{:.2}M", tokens / 1_000_000.0)
    } else if tokens >= 1_000.0 {
        format!("{:.1}K", tokens / 1_000.0)
    } else {
        format!("{tokens:.0}")
    }
}

/// Long form without abbreviation, rounded to whole tokens and grouped by
/// thousands: `"1,234,567"`.
pub fn format_amount_full(value: Option<U256>) -> String {
    let Some(value) = value.filter(|v| !v.is_zero()) else {
        return "0".to_string();
    };
    let whole = value.saturating_add(HALF_TOKEN) / ONE_TOKEN;
    group_thousands(&whole.to_string())
}

/// A plain counter such as the number of burn calls.
pub fn format_count(value: Option<U256>) -> String {
    value.unwrap_or_default().to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Compact duration: `"now"`, `"45s"`, `"2m 5s"`, `"1h 2m"`.
pub fn format_duration_secs(secs: u64) -> String {
    if secs == 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Share of the fixed total supply, e.g. `"(0.050% of supply)"`.
///
/// Empty for absent or zero amounts.
pub fn format_supply_share(value: Option<U256>, total_supply_tokens: u64) -> String {
    let Some(value) = value.filter(|v| !v.is_zero()) else {
        return String::new();
    };
    if total_supply_tokens == 0 {
        return String::new();
    }
    let percent = to_tokens(value) / total_supply_tokens as f64 * 100.0;
    if percent < 0.001 {
        "(< 0.001% of supply)".to_string()
    } else if percent < 0.01 {
        format!("({percent:.4}% of supply)")
    } else if percent < 1.0 {
        format!("({percent:.3}% of supply)")
    } else {
        format!("({percent:.2}% of supply)")
    }
}

/// Estimated USD value of `value` at `price_usd` per whole token.
///
/// `None` when either input is missing or the price is not a positive number.
pub fn format_usd(value: Option<U256>, price_usd: Option<f64>) -> Option<String> {
    let price = price_usd.filter(|p| p.is_finite() && *p > 0.0)?;
    let usd = to_tokens(value?) * price;
    Some(if usd >= 1_000_000.0 {
        format!("${:.2}M", usd / 1_000_000.0)
    } else if usd >= 1_000.0 {
        format!("${:.2}K", usd / 1_000.0)
    } else if usd >= 0.01 {
        format!("${usd:.2}")
    } else {
        "< $0.01".to_string()
    })
}

/// The unit price itself, with enough digits for sub-cent tokens.
pub fn format_price(price_usd: Option<f64>) -> String {
    match price_usd.filter(|p| p.is_finite() && *p > 0.0) {
        Some(p) if p >= 1.0 => format!("${p:.4}"),
        Some(p) => format!("${p:.8}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: u64) -> U256 {
        U256::from(n) * ONE_TOKEN
    }

    #[test_case::test_case(None, "0"; "absent")]
    #[test_case::test_case(Some(U256::ZERO), "0"; "zero")]
    #[test_case::test_case(Some(U256::from(999)), "0"; "dust")]
    #[test_case::test_case(Some(tokens(42)), "42"; "plain")]
    #[test_case::test_case(Some(tokens(1_500)), "1.5K"; "thousands")]
    #[test_case::test_case(Some(tokens(2_500_000)), "2.50M"; "millions")]
    fn short_amount(value: Option<U256>, expected: &str) {
        assert_eq!(format_amount(value), expected);
    }

    #[test_case::test_case(None, "0"; "absent")]
    #[test_case::test_case(Some(tokens(999)), "999"; "no separator")]
    #[test_case::test_case(Some(tokens(1_234_567)), "1,234,567"; "grouped")]
    #[test_case::test_case(Some(tokens(1_000) + HALF_TOKEN), "1,001"; "rounds half up")]
    fn full_amount(value: Option<U256>, expected: &str) {
        assert_eq!(format_amount_full(value), expected);
    }

    #[test_case::test_case(0, "now")]
    #[test_case::test_case(45, "45s")]
    #[test_case::test_case(60, "1m 0s")]
    #[test_case::test_case(125, "2m 5s")]
    #[test_case::test_case(3725, "1h 2m")]
    fn duration(secs: u64, expected: &str) {
        assert_eq!(format_duration_secs(secs), expected);
    }

    #[test]
    fn supply_share_thresholds() {
        let supply = 1_000_000_000;
        assert_eq!(format_supply_share(None, supply), "");
        assert_eq!(
            format_supply_share(Some(tokens(5_000)), supply),
            "(< 0.001% of supply)"
        );
        assert_eq!(
            format_supply_share(Some(tokens(50_000)), supply),
            "(0.0050% of supply)"
        );
        assert_eq!(
            format_supply_share(Some(tokens(500_000)), supply),
            "(0.050% of supply)"
        );
        assert_eq!(
            format_supply_share(Some(tokens(25_000_000)), supply),
            "(2.50% of supply)"
        );
    }

    #[test]
    fn usd_needs_positive_price() {
        assert_eq!(format_usd(Some(tokens(10)), None), None);
        assert_eq!(format_usd(Some(tokens(10)), Some(0.0)), None);
        assert_eq!(format_usd(Some(tokens(10)), Some(f64::NAN)), None);
        assert_eq!(format_usd(None, Some(1.0)), None);
    }

    #[test]
    fn usd_scales() {
        assert_eq!(format_usd(Some(tokens(10)), Some(1.5)).unwrap(), "$15.00");
        assert_eq!(
            format_usd(Some(tokens(500_000)), Some(0.01)).unwrap(),
            "$5.00K"
        );
        assert_eq!(
            format_usd(Some(tokens(2_000_000)), Some(1.0)).unwrap(),
            "$2.00M"
        );
        assert_eq!(format_usd(Some(tokens(1)), Some(0.0001)).unwrap(), "< $0.01");
    }

    #[test]
    fn fractional_tokens_keep_precision() {
        let half = ONE_TOKEN / U256::from(2);
        assert_eq!(to_tokens(half), 0.5);
        assert_eq!(to_tokens(tokens(3) + half), 3.5);
    }
}
