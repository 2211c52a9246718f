//! Seed strings: the only replay token a draft needs.
//!
//! The engine never reads the clock. Callers that want a fresh seed pass in
//! their own entropy (typically wall-clock milliseconds) and get back a short
//! lowercase base-36 string.

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render entropy as a lowercase base-36 seed string.
#[must_use]
pub fn seed_from_entropy(entropy: u64) -> String {
    if entropy == 0 {
        return "0".to_string();
    }
    let mut value = entropy;
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or(0);
        digits.push(BASE36_DIGITS[digit]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Trim a user-entered seed. An empty seed is still a valid seed.
#[must_use]
pub fn normalize_seed(raw: &str) -> String {
    raw.trim().to_string()
}
