//! Lenient integer parsing
//!
//! Legacy senders rely on numeric fields never failing to parse: a field
//! without digits reads as 0 and trailing junk after the digits is ignored.
//! Every numeric field goes through [`lenient_int`] so a stricter parser can
//! be swapped in at one place.

/// Parse a decimal integer the way C `atol` does.
///
/// Skips leading ASCII whitespace, accepts one optional `+` or `-`, then
/// consumes the longest run of digits. Returns 0 when no digit follows.
/// Values outside the `i32` range saturate.
pub fn lenient_int(text: &str) -> i32 {
    let mut bytes = text
        .as_bytes()
        .iter()
        .copied()
        .skip_while(|b| b.is_ascii_whitespace())
        .peekable();

    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    // Accumulate towards the sign so i32::MIN is reachable
    let mut value: i32 = 0;
    for b in bytes.take_while(u8::is_ascii_digit) {
        let digit = i32::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    value
}
