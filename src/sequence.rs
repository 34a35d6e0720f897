//! Fibonacci sequence generation and length normalization.

/// Smallest sequence length the strip accepts
pub const MIN_LENGTH: usize = 10;
/// Largest sequence length the strip accepts
pub const MAX_LENGTH: usize = 50;
/// Length used when nothing else is configured
pub const DEFAULT_LENGTH: usize = MIN_LENGTH;

/// Generate the first `length` Fibonacci numbers, starting 0, 1.
///
/// Callers clamp `length` before calling; no bounds are enforced here.
/// Lengths below 2 return a truncation of the seed values.
pub fn generate(length: usize) -> Vec<u64> {
    let mut sequence = Vec::with_capacity(length);
    let (mut current, mut next) = (0u64, 1u64);
    for _ in 0..length {
        sequence.push(current);
        let following = current.saturating_add(next);
        current = next;
        next = following;
    }
    sequence
}

/// Parse the leading integer of `raw`.
///
/// Leading whitespace is skipped and a single sign is accepted. Parsing stops
/// at the first non-digit. Text without leading digits parses to 0.
pub fn parse_length_input(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else {
            break;
        };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(d as i64);
    }

    if !seen_digit {
        return 0;
    }
    if negative {
        // i64::MAX negates to -i64::MAX
        value.saturating_neg()
    } else {
        value
    }
}

/// Clamp an arbitrary integer into `[MIN_LENGTH, MAX_LENGTH]`
pub fn clamp_length(value: i64) -> usize {
    value.clamp(MIN_LENGTH as i64, MAX_LENGTH as i64) as usize
}

/// Normalize raw input text into a valid sequence length
pub fn normalize_length(raw: &str) -> usize {
    clamp_length(parse_length_input(raw))
}
