/// Форматирует число с разделителями тысяч (запятыми)
///
/// # Примеры
/// ```ignore
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Money with two decimals and thousands separators, e.g. `1,234.50`
pub fn format_amount(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let whole = format_number(cents / 100);
    let fraction = (cents % 100).abs();
    if cents < 0 && cents / 100 == 0 {
        format!("-{}.{:02}", whole, fraction)
    } else {
        format!("{}.{:02}", whole, fraction)
    }
}
