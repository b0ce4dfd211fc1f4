/// Format an amount in plain decimal notation: integral values without a
/// fraction (`100`), everything else in shortest round-trip form (`1234.5`).
/// Negative zero prints as `0`. Exponent notation is never used.
pub fn amount(val: f64) -> String {
    if val == 0.0 {
        return "0".to_string();
    }
    format!("{val}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_formatting() {
        assert_eq!(amount(100.0), "100");
        assert_eq!(amount(1234.5), "1234.5");
        assert_eq!(amount(-500.25), "-500.25");
        assert_eq!(amount(0.0), "0");
        assert_eq!(amount(-0.0), "0");
        assert_eq!(amount(0.1), "0.1");
        assert_eq!(amount(1e21), "1000000000000000000000");
    }
}
