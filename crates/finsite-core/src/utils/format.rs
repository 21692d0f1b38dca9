/// Group the digits of a non-negative integer the Indian way:
/// last three digits, then pairs (`1161695` -> `11,61,695`).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format an amount as whole rupees: `₹11,61,695`.
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{}₹{}", sign, group_indian(&digits))
}

/// Format a price with paise: `₹1,234.50`.
pub fn format_price(price: f64) -> String {
    let sign = if price < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", price.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}₹{}.{}", sign, group_indian(whole), fraction)
}

/// Compact notation used for volumes and large amounts: `1.2Cr`, `11.6L`, `5.0K`.
pub fn format_compact(value: f64) -> String {
    if value >= 10_000_000.0 {
        format!("{:.1}Cr", value / 10_000_000.0)
    } else if value >= 100_000.0 {
        format!("{:.1}L", value / 100_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value)
    }
}

/// Signed percentage with two decimals: `+1.25%`, `-0.40%`.
pub fn format_percentage(percent: f64) -> String {
    let sign = if percent >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, percent)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
