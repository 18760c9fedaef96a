//! Bet sizing helper: half of the deposit spread over the planned shots.

/// Per-shot bet for `total_deposit` spread across `shots`.
///
/// Invalid input (non-finite or non-positive) yields `0.0`.
pub fn bet_point(total_deposit: f64, shots: i64) -> f64 {
    if !total_deposit.is_finite() || total_deposit <= 0.0 {
        return 0.0;
    }
    if shots <= 0 {
        return 0.0;
    }
    (total_deposit / 2.0) / shots as f64
}

/// Format with up to eight decimals, dropping trailing zeros.
pub fn format_bet_point(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return "0".to_string();
    }
    let fixed = format!("{:.8}", value);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bet_point() {
        assert_eq!(bet_point(100.0, 10), 5.0);
        assert_eq!(bet_point(1.0, 3), 0.5 / 3.0);
    }

    #[test]
    fn test_bet_point_invalid_input() {
        assert_eq!(bet_point(0.0, 10), 0.0);
        assert_eq!(bet_point(-5.0, 10), 0.0);
        assert_eq!(bet_point(f64::NAN, 10), 0.0);
        assert_eq!(bet_point(f64::INFINITY, 10), 0.0);
        assert_eq!(bet_point(100.0, 0), 0.0);
        assert_eq!(bet_point(100.0, -2), 0.0);
    }

    #[test]
    fn test_format_bet_point() {
        assert_eq!(format_bet_point(5.0), "5");
        assert_eq!(format_bet_point(0.5), "0.5");
        assert_eq!(format_bet_point(0.5 / 3.0), "0.16666667");
        assert_eq!(format_bet_point(0.0), "0");
        assert_eq!(format_bet_point(f64::NAN), "0");
        assert_eq!(format_bet_point(100.0), "100");
    }
}
