//! Display formatting for KPI cards.

/// Brazilian currency: `R$ 1.234,56`. Negative amounts keep the sign after
/// the symbol, `R$ -1.234,56`.
pub fn format_brl(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }

    // no sign on amounts that round to zero
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("R$ {}{},{}", sign, grouped, frac_part)
}

pub fn format_years(value: f64) -> String {
    format!("{:.1} years", value)
}

pub fn format_rating(value: f64) -> String {
    format!("{:.2}", value)
}
