//! Lenient integer parsing for console values
//!
//! Console values are typed by hand on a terminal, so the parser reads as much of a number as it
//! can and ignores the rest. Text which does not start with a number yields zero rather than an
//! error.

/// Parse an integer from the start of `text`
///
/// - Leading ASCII whitespace is skipped, and an optional `+` or `-` sign is accepted.
/// - A `0x` or `0X` prefix selects hexadecimal, anything else is read as decimal.
/// - Parsing stops at the first character which is not a digit in the selected base.
/// - If no digits are found the result is 0.
/// - Values outside the `i32` range saturate to `i32::MIN` / `i32::MAX`.
pub fn parse_int(text: &[u8]) -> i32 {
    let mut pos = 0;
    while pos < text.len() && text[pos].is_ascii_whitespace() {
        pos += 1;
    }

    let mut negative = false;
    if let Some(&sign) = text.get(pos) {
        if sign == b'-' || sign == b'+' {
            negative = sign == b'-';
            pos += 1;
        }
    }

    let mut radix = 10;
    if text.len() > pos + 2
        && text[pos] == b'0'
        && (text[pos + 1] == b'x' || text[pos + 1] == b'X')
        && text[pos + 2].is_ascii_hexdigit()
    {
        radix = 16;
        pos += 2;
    }

    let mut magnitude: i64 = 0;
    for &c in &text[pos..] {
        let digit = match (c as char).to_digit(radix) {
            Some(d) => d as i64,
            None => break,
        };
        // Anything past i32 range is going to saturate anyway, so stop growing once there
        magnitude = (magnitude * radix as i64 + digit).min(i32::MAX as i64 + 1);
    }

    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
