//! Display formatting for P&L amounts.

/// Abbreviated currency label: `$999`, `$1k`, `-$2k`.
///
/// The amount is rounded up (toward +inf) first, so small positive values
/// show as `$1` and small negative ones as `$0`. Lossy; for display only.
/// Magnitudes past the integer range keep every digit; NaN shows as `$0`
/// and infinities as `$infk` / `-$infk`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "$0".to_string();
    }
    let rounded = amount.ceil();
    let magnitude = rounded.abs();
    let sign = if rounded < 0.0 { "-" } else { "" };

    if magnitude >= 1000.0 {
        format!("{sign}${}k", (magnitude / 1000.0).ceil())
    } else {
        format!("{sign}${magnitude}")
    }
}
