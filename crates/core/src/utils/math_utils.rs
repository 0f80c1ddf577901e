/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_one_decimal() {
        assert_eq!(round_to(600.0 / 7.0, 1), 85.7);
        assert_eq!(round_to(100.0, 1), 100.0);
        assert_eq!(round_to(0.05, 1), 0.1);
    }
}
