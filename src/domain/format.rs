//! Display helpers for money, times and volumes.

/// Direction of a P&L figure once sub-cent noise is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnlTone {
    Profit,
    Loss,
    Flat,
}

pub fn pnl_tone(value: f64) -> PnlTone {
    if value > 0.005 {
        PnlTone::Profit
    } else if value < -0.005 {
        PnlTone::Loss
    } else {
        PnlTone::Flat
    }
}

/// Groups the integer digits of `digits` in threes.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `1234.5` → `$1,234.50`, `-3` → `-$3.00`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let body = format!("${}.{}", group_thousands(int_part), frac_part);
    if value < 0.0 && fixed != "0.00" {
        format!("-{body}")
    } else {
        body
    }
}

/// Currency with an explicit `+` on gains.
pub fn format_pnl(value: f64) -> String {
    match pnl_tone(value) {
        PnlTone::Profit => format!("+{}", format_currency(value)),
        _ => format_currency(value),
    }
}

/// `09:30:00` → `9:30 AM`.
pub fn format_time_12h(time: &str) -> String {
    let mut parts = time.split(':');
    let (Some(h), Some(m)) = (parts.next(), parts.next()) else {
        return time.to_string();
    };
    let Ok(hour) = h.trim().parse::<u32>() else {
        return time.to_string();
    };
    match hour {
        0 => format!("12:{m} AM"),
        1..=11 => format!("{hour}:{m} AM"),
        12 => format!("12:{m} PM"),
        _ => format!("{}:{m} PM", hour - 12),
    }
}

pub fn format_volume(volume: f64) -> String {
    if !volume.is_finite() {
        return "n/a".to_string();
    }
    let rounded = volume.abs().round() as u64;
    let grouped = group_thousands(&rounded.to_string());
    if volume < 0.0 && rounded > 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
