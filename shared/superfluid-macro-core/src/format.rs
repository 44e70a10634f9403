//! Fixed-decimal display of token amounts and flow rates for signing messages.

use alloy_primitives::{aliases::I96, U256};

/// Fractional digits shown in messages.
pub const DISPLAY_DECIMALS: u8 = 5;

/// Decimals of every super token.
pub const SUPER_TOKEN_DECIMALS: u8 = 18;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Format `raw` smallest units of a `decimals`-decimal token with 5 fractional
/// digits, rounding half-up at the 6th.
pub fn format_amount(raw: U256, decimals: u8) -> String {
    let display_unit = U256::from(10u64.pow(DISPLAY_DECIMALS as u32));

    let (whole, frac) = if decimals <= DISPLAY_DECIMALS {
        // pow10 cannot overflow below 6 digits.
        let unit = pow10(decimals).unwrap_or(U256::from(1u64));
        let widen = pow10(DISPLAY_DECIMALS - decimals).unwrap_or(U256::from(1u64));
        (raw / unit, (raw % unit) * widen)
    } else {
        let Some(scale) = pow10(decimals - DISPLAY_DECIMALS) else {
            // 10^78 exceeds U256, so the value is below the display precision.
            return format!("0.{:0>width$}", 0, width = DISPLAY_DECIMALS as usize);
        };
        let mut units = raw / scale;
        let rem = raw % scale;
        if rem >= scale - rem {
            units += U256::from(1u64);
        }
        (units / display_unit, units % display_unit)
    };

    let frac = u64::try_from(frac).unwrap_or_default();
    format!("{whole}.{frac:0>width$}", width = DISPLAY_DECIMALS as usize)
}

/// Format a per-second flow rate of an 18-decimal super token as a per-day
/// amount. Negative rates keep their sign.
pub fn format_flow_rate_per_day(rate: I96) -> String {
    let per_second = U256::from_limbs_slice(rate.unsigned_abs().as_limbs());
    let per_day = per_second * U256::from(SECONDS_PER_DAY);
    let formatted = format_amount(per_day, SUPER_TOKEN_DECIMALS);
    if rate.is_negative() {
        format!("-{formatted}")
    } else {
        formatted
    }
}

fn pow10(exp: u8) -> Option<U256> {
    let ten = U256::from(10u64);
    (0..exp).try_fold(U256::from(1u64), |acc, _| acc.checked_mul(ten))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(v: i64) -> I96 {
        I96::try_from(v).unwrap()
    }

    #[test]
    fn test_flow_rate_point_one_per_day() {
        assert_eq!(format_flow_rate_per_day(rate(1_157_407_407_407)), "0.10000");
    }

    #[test]
    fn test_negative_flow_rate_keeps_sign() {
        assert_eq!(format_flow_rate_per_day(rate(-1_157_407_407_407)), "-0.10000");
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(format_amount(U256::ZERO, 18), "0.00000");
        assert_eq!(format_flow_rate_per_day(I96::ZERO), "0.00000");
    }

    #[test]
    fn test_rounds_half_up_at_sixth_decimal() {
        // 1.234565 -> 1.23457
        let amount = U256::from(1_234_565_000_000_000_000u64);
        assert_eq!(format_amount(amount, 18), "1.23457");
        // 1.2345649.. -> 1.23456
        let amount = U256::from(1_234_564_999_999_999_999u64);
        assert_eq!(format_amount(amount, 18), "1.23456");
    }

    #[test]
    fn test_pads_fraction_to_five_digits() {
        let amount = U256::from(12_000_000_000_000_000u64); // 0.012
        assert_eq!(format_amount(amount, 18), "0.01200");
        assert_eq!(format_amount(U256::from(5_000_000u64), 6), "5.00000");
    }

    #[test]
    fn test_small_decimals_scale_up() {
        assert_eq!(format_amount(U256::from(1234u64), 2), "12.34000");
        assert_eq!(format_amount(U256::from(7u64), 0), "7.00000");
    }

    #[test]
    fn test_extreme_values_do_not_panic() {
        assert_eq!(
            format_amount(U256::MAX, 18),
            "115792089237316195423570985008687907853269984665640564039457.58401"
        );
        assert_eq!(format_amount(U256::MAX, 82), "0.00001");
        assert_eq!(format_amount(U256::MAX, 255), "0.00000");

        let min = format_flow_rate_per_day(I96::MIN);
        assert!(min.starts_with('-'));
        let max = format_flow_rate_per_day(I96::MAX);
        assert!(!max.starts_with('-'));
    }
}
