//! Up/down day bitstring.

/// Encodes the last `points` prices as an up/down bitstring, newest first.
///
/// Each day-over-day change becomes `'1'` when strictly positive and `'0'`
/// otherwise, so a flat day reads as down. The oldest price of the window
/// has no predecessor inside it, which leaves `points - 1` characters.
/// Returns `None` when fewer than `points` prices exist or `points < 2`.
///
/// # Example
///
/// ```
/// use navpick_features::updown_pattern;
///
/// let prices = [1.0, 1.1, 1.05, 1.05, 1.2];
/// assert_eq!(updown_pattern(&prices, 5).as_deref(), Some("1001"));
/// assert_eq!(updown_pattern(&prices, 6), None);
/// ```
pub fn updown_pattern(prices: &[f64], points: usize) -> Option<String> {
    if points < 2 || prices.len() < points {
        return None;
    }

    let window = &prices[prices.len() - points..];
    Some(
        window
            .windows(2)
            .rev()
            .map(|w| if w[1] - w[0] > 0.0 { '1' } else { '0' })
            .collect(),
    )
}
