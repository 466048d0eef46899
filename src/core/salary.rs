use crate::domain::model::{RawPosting, SalaryBounds};

const FLOOR_ONLY_FACTOR: f64 = 1.2;
const CEILING_ONLY_FACTOR: f64 = 0.8;

// 0、負數、NaN 都當作沒填
fn usable(bound: Option<f64>) -> Option<f64> {
    bound.filter(|v| v.is_finite() && *v > 0.0)
}

/// Representative salary for a (lower, upper) pair.
///
/// Both bounds give their mean, a lone floor is scaled up by 1.2 and a lone
/// ceiling scaled down by 0.8. Without bounds there is no estimate.
pub fn estimate(lower: Option<f64>, upper: Option<f64>) -> Option<f64> {
    match (usable(lower), usable(upper)) {
        (Some(from), Some(to)) => Some((from + to) / 2.0),
        (Some(from), None) => Some(from * FLOOR_ONLY_FACTOR),
        (None, Some(to)) => Some(to * CEILING_ONLY_FACTOR),
        (None, None) => None,
    }
}

pub fn estimate_bounds(bounds: &SalaryBounds) -> Option<f64> {
    estimate(bounds.from, bounds.to)
}

/// Estimate gated on the source currency; other currencies give no estimate.
pub fn estimate_for(posting: &RawPosting, expected_currency: &str) -> Option<f64> {
    match posting.currency.as_deref() {
        Some(currency) if currency == expected_currency => estimate_bounds(&posting.salary),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(currency: Option<&str>, from: Option<f64>, to: Option<f64>) -> RawPosting {
        RawPosting {
            title: "Rust developer".to_string(),
            currency: currency.map(str::to_string),
            salary: SalaryBounds::new(from, to),
        }
    }

    #[test]
    fn test_estimate_both_bounds_is_mean() {
        assert_eq!(estimate(Some(100_000.0), Some(200_000.0)), Some(150_000.0));
    }

    #[test]
    fn test_estimate_floor_only() {
        let value = estimate(Some(120_000.0), None).unwrap();
        assert!((value - 144_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_ceiling_only() {
        let value = estimate(None, Some(100_000.0)).unwrap();
        assert!((value - 80_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_without_bounds() {
        assert_eq!(estimate(None, None), None);
    }

    #[test]
    fn test_zero_bound_counts_as_missing() {
        assert_eq!(estimate(Some(0.0), Some(0.0)), None);
        let value = estimate(Some(50_000.0), Some(0.0)).unwrap();
        assert!((value - 60_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_for_requires_matching_currency() {
        let rub = posting(Some("RUR"), Some(100_000.0), Some(200_000.0));
        assert_eq!(estimate_for(&rub, "RUR"), Some(150_000.0));

        let usd = posting(Some("USD"), Some(100_000.0), Some(200_000.0));
        assert_eq!(estimate_for(&usd, "RUR"), None);

        // 比對區分大小寫：hh 用 RUR、superjob 用 rub
        assert_eq!(estimate_for(&rub, "rur"), None);

        let missing = posting(None, Some(100_000.0), None);
        assert_eq!(estimate_for(&missing, "RUR"), None);
    }
}
