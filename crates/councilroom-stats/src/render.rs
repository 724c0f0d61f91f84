//! Rounding and text rendering for statistics tables

/// Glyph joining a mean and its error
pub const PLUS_MINUS: &str = " ± ";

/// Round to `places` decimal places: `round(val * 10^places) / 10^places`.
///
/// Halves round away from zero.
pub fn round_to(val: f64, places: u32) -> f64 {
    let pow = 10f64.powi(places as i32);
    (val * pow).round() / pow
}

/// Render a mean and standard error, each rounded independently
pub fn format_mean_var(mean: f64, standard_error: f64, digits: u32) -> String {
    format!(
        "{}{}{}",
        round_to(mean, digits),
        PLUS_MINUS,
        round_to(standard_error, digits)
    )
}

/// Percentage of `part` in `whole`, rounded to `places`
pub fn percent(part: f64, whole: f64, places: u32) -> f64 {
    round_to(100.0 * part / whole, places)
}
