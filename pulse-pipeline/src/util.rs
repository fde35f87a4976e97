/// Extract a short type name from the full module path.
///
/// Given `"pulse_pipeline::components::stockout_rule::StockoutRule"`,
/// returns `"StockoutRule"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

/// `""` for one, `"s"` otherwise.
pub fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
