use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use proptest::prelude::*;

use zipform::decode;

/// Shapes the decimal strategy claims before base64 is tried: `^-?[0-9]+$`.
fn decimal_shaped(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

proptest! {
    #[test]
    fn base64_round_trips(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        for engine in [&STANDARD, &STANDARD_NO_PAD, &URL_SAFE, &URL_SAFE_NO_PAD] {
            let encoded = engine.encode(&bytes);
            // A digit-only encoding (url-safe may lead with `-`) is read as a
            // decimal list first.
            prop_assume!(!decimal_shaped(&encoded));
            prop_assert_eq!(decode(&encoded).unwrap(), bytes.clone());
        }
    }

    #[test]
    fn decimal_lists_wrap(values in proptest::collection::vec(-100_000i64..100_000, 1..64)) {
        let text = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        let expected: Vec<u8> = values.iter().map(|v| (((v % 256) + 256) % 256) as u8).collect();
        prop_assert_eq!(decode(&text).unwrap(), expected);
    }
}

#[test]
fn decimal_shape_filter() {
    assert!(decimal_shaped("-123"));
    assert!(decimal_shaped("0042"));
    assert!(!decimal_shaped("-"));
    assert!(!decimal_shaped("-12a"));
}

#[test]
fn decimal_precedence_and_negative_wrap() {
    assert_eq!(decode("65,66,67").unwrap(), vec![65, 66, 67]);
    assert_eq!(decode("-1").unwrap(), vec![255]);
}
