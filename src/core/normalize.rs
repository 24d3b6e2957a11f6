/// Appended to every non-empty normalized price.
pub const CURRENCY_SUFFIX: &str = " ₴";

/// Keeps only digits and whitespace, then tags the amount with the currency.
///
/// Returns an empty string when the input carries no digits at all, which
/// callers treat as "price not found".
pub fn normalize_price(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_whitespace())
        .collect();
    let digits = digits.trim();

    if digits.is_empty() {
        String::new()
    } else {
        format!("{}{}", digits, CURRENCY_SUFFIX)
    }
}

/// Swaps double quotes for single quotes. Trimming is up to the caller.
pub fn normalize_title(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    raw.replace('"', "'")
}
