#![no_main]

use libfuzzer_sys::fuzz_target;
use walletsim_traits::{is_valid_address, shorten, ADDRESS_LEN};

fuzz_target!(|data: &str| {
    if is_valid_address(data) {
        assert_eq!(data.len(), ADDRESS_LEN);
        assert!(data.starts_with("0x"));
        assert!(data[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    // Shortening never panics, even on multi-byte input
    let short = shorten(data);
    if data.chars().count() > 10 {
        assert_eq!(short.chars().count(), 13);
    } else {
        assert_eq!(short, data);
    }
});
