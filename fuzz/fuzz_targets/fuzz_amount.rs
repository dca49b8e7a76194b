#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use walletsim_traits::{Amount, WalletsimError, DECIMALS};

#[derive(Debug, Arbitrary)]
struct AmountInput {
    // Two u64s make up the wei value
    wei_parts: [u64; 2],
    human: f64,
    text: String,
    parts: u8,
    places: u8,
}

fuzz_target!(|input: AmountInput| {
    let wei = (u128::from(input.wei_parts[0]) << 64) | u128::from(input.wei_parts[1]);
    let amount = Amount::from_smallest_unit(wei);

    // Rendering and re-parsing a rounded value is lossless
    let places = u32::from(input.places) % (DECIMALS + 1);
    let rounded = amount.round_to(places);
    if rounded.smallest_unit() >= wei {
        let text = rounded.to_fixed(places);
        let back: Amount = text.parse().expect("rendered amount must parse");
        assert_eq!(back, rounded, "to_fixed/parse mismatch for {text}");
    }

    // Splitting never exceeds the total
    let parts = usize::from(input.parts);
    let share = amount.split(parts);
    if parts > 0 {
        assert!(share.smallest_unit() * parts as u128 <= wei);
    }

    // from_human never panics and never goes negative
    let _ = Amount::from_human(input.human);

    // Parsing arbitrary text never panics; negatives are value errors
    match input.text.parse::<Amount>() {
        Ok(parsed) => assert!(!input.text.trim().starts_with('-') || parsed.is_zero()),
        Err(WalletsimError::InvalidAmount) => assert!(input.text.trim().starts_with('-')),
        Err(WalletsimError::MalformedAmount(_)) => {}
        Err(other) => panic!("unexpected parse error: {other:?}"),
    }
});
