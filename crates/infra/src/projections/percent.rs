//! Percentage rendering for derived host fields.
//!
//! Values are rounded half-up to hundredths and printed with at most two
//! fractional digits and no trailing zeros: `25%`, `12.5%`, `33.33%`.

/// Rendered when a host declares no CPU capacity.
pub const UNAVAILABLE: &str = "unavailable";

/// `allocated / capacity * 100`, or [`UNAVAILABLE`] for zero capacity.
pub fn allocated_percent(allocated_mhz: u64, capacity_mhz: u64) -> String {
    if capacity_mhz == 0 {
        return UNAVAILABLE.to_string();
    }
    let num = u128::from(allocated_mhz) * 10_000 * 2 + u128::from(capacity_mhz);
    let den = u128::from(capacity_mhz) * 2;
    format_hundredths(num / den)
}

/// Live utilization already expressed in percent. `None` when the agent
/// reported a non-finite value.
pub fn utilization_percent(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let hundredths = (value.abs() * 100.0).round();
    if hundredths > u128::MAX as f64 {
        return None;
    }
    let rendered = format_hundredths(hundredths as u128);
    if value < 0.0 && hundredths > 0.0 {
        Some(format!("-{rendered}"))
    } else {
        Some(rendered)
    }
}

fn format_hundredths(hundredths: u128) -> String {
    let whole = hundredths / 100;
    let frac = hundredths % 100;
    if frac == 0 {
        format!("{whole}%")
    } else if frac % 10 == 0 {
        format!("{whole}.{}%", frac / 10)
    } else {
        format!("{whole}.{frac:02}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_without_trailing_zeros() {
        assert_eq!(allocated_percent(2000, 8000), "25%");
        assert_eq!(allocated_percent(1000, 8000), "12.5%");
        assert_eq!(allocated_percent(1, 3), "33.33%");
        assert_eq!(allocated_percent(2, 3), "66.67%");
        assert_eq!(allocated_percent(0, 3), "0%");
        assert_eq!(allocated_percent(1, 400), "0.25%");
        assert_eq!(allocated_percent(1, 1000), "0.1%");
    }

    #[test]
    fn overcommit_exceeds_one_hundred() {
        assert_eq!(allocated_percent(3000, 2000), "150%");
    }

    #[test]
    fn zero_capacity_is_unavailable() {
        assert_eq!(allocated_percent(0, 0), UNAVAILABLE);
        assert_eq!(allocated_percent(500, 0), UNAVAILABLE);
    }

    #[test]
    fn utilization_rounds_to_hundredths() {
        assert_eq!(utilization_percent(12.345_6).as_deref(), Some("12.35%"));
        assert_eq!(utilization_percent(0.0).as_deref(), Some("0%"));
        assert_eq!(utilization_percent(99.9).as_deref(), Some("99.9%"));
        assert_eq!(utilization_percent(f64::NAN), None);
        assert_eq!(utilization_percent(f64::INFINITY), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: allocation never exceeding capacity renders within 0..=100
        /// with at most two fractional digits.
        #[test]
        fn allocation_within_capacity_is_bounded(
            capacity in 1u64..=10_000_000,
            share in 0u64..=10_000,
        ) {
            let allocated = capacity * share / 10_000;
            let rendered = allocated_percent(allocated, capacity);
            let number = rendered.strip_suffix('%').unwrap();
            let value: f64 = number.parse().unwrap();
            prop_assert!((0.0..=100.0).contains(&value));
            if let Some((_, frac)) = number.split_once('.') {
                prop_assert!(!frac.is_empty() && frac.len() <= 2);
                prop_assert!(!frac.ends_with('0'));
            }
        }
    }
}
