//! Field normalizers for the export's mixed value encodings.
//!
//! Every parser here is total: absent, empty, or unparseable cells map to
//! zero (or `None` for sequence keys) so aggregation never fails on dirty
//! rows. Malformed values are a data-quality fact of the export, not an
//! error condition.

use crate::model::Scalar;

/// Parses a rate cell to a percentage in 0..=100 terms.
///
/// Numbers use the fraction-of-one convention and are scaled by 100. A
/// string containing `%` is read as a percentage literal; other numeric
/// strings <= 1 are treated as fractions, larger ones as percentages.
pub fn parse_rate(value: Option<&Scalar>) -> f64 {
    match value {
        None => 0.0,
        Some(Scalar::Number(n)) => {
            if n.is_finite() {
                n * 100.0
            } else {
                0.0
            }
        }
        Some(Scalar::Text(s)) => {
            if s.contains('%') {
                parse_float_prefix(&s.replace('%', "")).unwrap_or(0.0)
            } else {
                match parse_float_prefix(s) {
                    Some(v) if v <= 1.0 => v * 100.0,
                    Some(v) => v,
                    None => 0.0,
                }
            }
        }
    }
}

/// Parses an elapsed-time cell to whole seconds.
///
/// Numbers pass through. Strings carrying the 分/秒 unit markers sum the
/// marked quantities ("2分30秒" -> 150); other strings parse as a bare
/// number of seconds. Anything else is 0.
pub fn parse_seconds(value: Option<&Scalar>) -> i64 {
    match value {
        None => 0,
        Some(Scalar::Number(n)) => {
            if n.is_finite() && *n > 0.0 {
                *n as i64
            } else {
                0
            }
        }
        Some(Scalar::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return 0;
            }
            if s.contains('分') || s.contains('秒') {
                let minutes = quantity_before(s, '分').unwrap_or(0);
                let seconds = quantity_before(s, '秒').unwrap_or(0);
                return minutes * 60 + seconds;
            }
            match parse_float_prefix(s) {
                Some(v) if v > 0.0 => v as i64,
                _ => 0,
            }
        }
    }
}

/// Parses a positional key (unit or lesson number) the way the upstream
/// sheet does: leading integer of the string form, `None` when there is no
/// digit to read.
pub fn parse_sequence(value: Option<&Scalar>) -> Option<i64> {
    match value {
        None => None,
        Some(Scalar::Number(n)) => {
            if n.is_finite() {
                Some(n.trunc() as i64)
            } else {
                None
            }
        }
        Some(Scalar::Text(s)) => {
            let s = s.trim();
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s.strip_prefix('+').unwrap_or(s)),
            };
            let run: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
            if run.is_empty() {
                return None;
            }
            run.parse::<i64>().ok().map(|v| sign * v)
        }
    }
}

/// Round-half-up to a whole number, matching the display rounding the
/// report copy was written against.
pub fn round_off_whole(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Renders seconds as the report's duration label: "1小时 5分钟", "20分钟".
/// Sub-hour remainders round minutes up so short sessions never show 0.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "0分钟".to_string();
    }
    let hours = seconds / 3600;
    let remaining = seconds % 3600;
    let mins = (remaining + 59) / 60;
    if hours > 0 {
        if mins > 0 {
            format!("{}小时 {}分钟", hours, mins)
        } else {
            format!("{}小时", hours)
        }
    } else {
        format!("{}分钟", mins)
    }
}

/// Longest leading float of `s` after trimming, `None` if there is none.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim();
    let mut end = 0;
    let bytes = s.as_bytes();
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse::<f64>().ok()
}

/// Numeric run immediately preceding `marker`, skipping interior whitespace.
fn quantity_before(s: &str, marker: char) -> Option<i64> {
    let idx = s.find(marker)?;
    let digits: Vec<char> = s[..idx]
        .chars()
        .rev()
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    let run: String = digits.into_iter().rev().collect();
    run.parse::<i64>().ok()
}
