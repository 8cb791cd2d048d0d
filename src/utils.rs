use crate::financial_data::MetricValue;

/// Compact currency label for chart axes and tooltips.
///
/// Values of at least a million or a thousand are abbreviated to one decimal
/// (`$1.8M`, `$2.5K`). Anything smaller, negatives included, is written in
/// full with thousands separators and up to three decimals.
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${}{}", sign(value), group_digits(value.abs(), 3))
    }
}

/// Whole-dollar formatting for headline metrics, e.g. `-$1,235`.
///
/// Text values are stripped of everything but digits, `.` and `-` first;
/// text that still is not a number is returned unchanged.
pub fn format_metric_value(value: &MetricValue) -> String {
    let number = match value {
        MetricValue::Number(n) => *n,
        MetricValue::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            match cleaned.parse::<f64>() {
                Ok(n) => n,
                Err(_) => return text.clone(),
            }
        }
    };

    format!("{}${}", sign(number), group_digits(number.abs(), 0))
}

/// Change from `previous` to `current` in percent of `|previous|`.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous.abs() * 100.0)
}

/// "12.5% increase from previous period" style tooltip text.
pub fn describe_change(current: f64, previous: f64) -> Option<String> {
    let change = percent_change(current, previous)?;
    let direction = if change >= 0.0 { "increase" } else { "decrease" };
    Some(format!("{:.1}% {} from previous period", change.abs(), direction))
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 {
        "-"
    } else {
        ""
    }
}

fn group_digits(value: f64, max_fraction_digits: usize) -> String {
    let formatted = format!("{:.*}", max_fraction_digits, value);
    let (integer, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
