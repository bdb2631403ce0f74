//! Cheap content fingerprint used to audit restores.
//!
//! This is a 32-bit rolling hash (`h = h * 31 + unit` over UTF-16 code units),
//! rendered in base 36. It is not collision resistant and never gates a
//! restore; restores always copy the raw snapshot bytes.

/// Fingerprint `content`.
pub fn fingerprint(content: &str) -> String {
    let mut hash: i32 = 0;
    for unit in content.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    to_base36(i64::from(hash))
}

/// Fingerprint raw bytes; non-UTF-8 sequences are hashed as U+FFFD.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    fingerprint(&String::from_utf8_lossy(bytes))
}

fn to_base36(value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut magnitude = value.unsigned_abs();
    let mut digits = Vec::new();
    while magnitude > 0 {
        digits.push(DIGITS[(magnitude % 36) as usize]);
        magnitude /= 36;
    }
    if value < 0 {
        digits.push(b'-');
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
