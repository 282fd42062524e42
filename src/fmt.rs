/// Format integer minor units as a currency amount with thousands
/// separators: money(123456, "$") -> "$1,234.56"
pub fn money(cents: i64, symbol: &str) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let int_part = (abs / 100).to_string();
    let dec_part = abs % 100;

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{symbol}{with_commas}.{dec_part:02}")
    } else {
        format!("{symbol}{with_commas}.{dec_part:02}")
    }
}

/// Parse a user-entered decimal amount ("12.34", "12", "12.5") into minor
/// units. Rejects negatives and more than two decimal places.
pub fn parse_amount(input: &str) -> Option<i64> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('-') {
        return None;
    }
    let (int_part, dec_part) = match input.split_once('.') {
        Some((i, d)) => (i, d),
        None => (input, ""),
    };
    if dec_part.len() > 2 {
        return None;
    }
    let int_val: i64 = if int_part.is_empty() { 0 } else { int_part.parse().ok()? };
    let dec_val: i64 = if dec_part.is_empty() {
        0
    } else {
        let padded = format!("{dec_part:0<2}");
        padded.parse().ok()?
    };
    int_val.checked_mul(100)?.checked_add(dec_val)
}
