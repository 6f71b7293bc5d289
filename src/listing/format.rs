//! Display strings for normalized listing fields

use crate::utils::constants::{PRICE_ON_REQUEST, UNAVAILABLE};

/// Render a number the way the catalog's own pages do
///
/// Integral values drop the fractional part, so `150000.0` renders as
/// `150000` and `2.5` stays `2.5`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// `"<price> <currency>"` when there is a positive price and a currency
#[must_use]
pub fn format_price(price: Option<f64>, currency: Option<&str>) -> String {
    let currency = currency.map(str::trim).filter(|c| !c.is_empty());
    match (price, currency) {
        (Some(p), Some(c)) if p > 0.0 => format!("{} {c}", format_number(p)),
        _ => PRICE_ON_REQUEST.to_string(),
    }
}

/// Area in square meters, `"No disponible"` when absent
#[must_use]
pub fn format_area(value: Option<f64>) -> String {
    value.map_or_else(
        || UNAVAILABLE.to_string(),
        |v| format!("{} m²", format_number(v)),
    )
}

/// `"<n> <unit>"` for a positive count, `"No disponible"` otherwise
#[must_use]
pub fn format_count(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(n) if n > 0.0 => format!("{} {unit}", format_number(n)),
        _ => UNAVAILABLE.to_string(),
    }
}

/// Trimmed text or `"No disponible"` when missing or blank
#[must_use]
pub fn text_or_unavailable(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNAVAILABLE)
        .to_string()
}
