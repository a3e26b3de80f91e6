//! Utility functions and helpers

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Format a non-negative integer string with grouping separators
pub fn group_digits(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Display style for monetary values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyStyle {
    /// Currency symbol (e.g., "R$")
    pub symbol: String,
    /// Number of decimal places
    pub decimal_places: u32,
    /// Thousands separator
    pub thousands_separator: String,
    /// Decimal separator
    pub decimal_separator: String,
    /// Whether the symbol comes before the number
    pub symbol_before: bool,
}

impl Default for CurrencyStyle {
    fn default() -> Self {
        Self {
            symbol: "R$".to_string(),
            decimal_places: 2,
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            symbol_before: true,
        }
    }
}

impl CurrencyStyle {
    /// Format a monetary value for display (e.g., `R$ 1.234,56`)
    pub fn format(&self, amount: f64) -> String {
        let negative = amount < 0.0;
        let rounded = format!("{:.*}", self.decimal_places as usize, amount.abs());
        let (int_part, frac_part) = match rounded.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (rounded, String::new()),
        };

        let mut number = group_digits(&int_part, &self.thousands_separator);
        if !frac_part.is_empty() {
            number.push_str(&self.decimal_separator);
            number.push_str(&frac_part);
        }
        if negative {
            number.insert(0, '-');
        }

        if self.symbol.is_empty() {
            number
        } else if self.symbol_before {
            format!("{} {}", self.symbol, number)
        } else {
            format!("{} {}", number, self.symbol)
        }
    }
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique timestamp-derived ID
///
/// The millisecond timestamp gives creation ordering; the counter suffix
/// keeps IDs unique when several are generated within the same millisecond.
pub fn generate_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", now, seq)
}
