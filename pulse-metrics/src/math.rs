//! Zero-guarded arithmetic shared by the KPI engine, the aggregators and the
//! alert rules. Every ratio here is total: a non-positive or non-finite
//! denominator yields `0.0`, never NaN or infinity.

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Relative change in percent. Zero when the baseline is not positive.
pub fn pct_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        safe_ratio(current - previous, previous) * 100.0
    } else {
        0.0
    }
}

/// Arithmetic mean, zero for an empty input.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    safe_ratio(sum, count as f64)
}
