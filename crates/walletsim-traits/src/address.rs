//! Address shape checks and display helpers.

/// Length of a `0x`-prefixed 20-byte hex address
pub const ADDRESS_LEN: usize = 42;

/// Returns true if `address` matches `^0x[0-9a-fA-F]{40}$`.
///
/// Only the shape is checked; EIP-55 mixed-case checksums are not verified.
pub fn is_valid_address(address: &str) -> bool {
    address.len() == ADDRESS_LEN
        && address
            .strip_prefix("0x")
            .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Shortens an address or identifier to `0x742d...f44e` for display.
///
/// Strings of ten characters or fewer are returned unchanged.
pub fn shorten(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 10 {
        return value.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
