//! The base83 numeral system BlurHash serializes every field with.
//!
//! Digits are written most significant first. The alphabet order is part of
//! the wire format.

use crate::error::BlurhashError;

/// The 83 digit characters, in digit order.
pub const ALPHABET: &[u8; 83] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz#$%*+,-.:;=?@[]^_{|}~";

const NOT_A_DIGIT: u8 = u8::MAX;

const fn build_digit_table() -> [u8; 128] {
    let mut table = [NOT_A_DIGIT; 128];
    let mut digit = 0;
    while digit < ALPHABET.len() {
        table[ALPHABET[digit] as usize] = digit as u8;
        digit += 1;
    }
    table
}

/// ASCII byte -> digit value, `NOT_A_DIGIT` for anything outside the alphabet.
static DIGITS: [u8; 128] = build_digit_table();

/// Look up the digit value of a single byte.
///
/// ```
/// use blurhash_codec::base83::digit;
/// assert_eq!(digit(b'A'), Some(10));
/// assert_eq!(digit(b'~'), Some(82));
/// assert_eq!(digit(b'!'), None);
/// ```
#[inline]
pub fn digit(byte: u8) -> Option<u8> {
    match DIGITS.get(usize::from(byte)) {
        Some(&NOT_A_DIGIT) | None => None,
        Some(&value) => Some(value),
    }
}

/// Check that every character of `text` is a base83 digit.
///
/// # Errors
///
/// Returns [`BlurhashError::InvalidCharacter`] for the first character that
/// is not in the alphabet, with its byte position.
pub fn validate(text: &str) -> Result<(), BlurhashError> {
    match text
        .char_indices()
        .find(|&(_, ch)| !ch.is_ascii() || digit(ch as u8).is_none())
    {
        Some((position, character)) => Err(BlurhashError::InvalidCharacter {
            character,
            position,
        }),
        None => Ok(()),
    }
}

/// Decode a base83 string into an integer.
///
/// Inputs longer than ten digits wrap around; BlurHash fields are at most
/// four digits wide.
///
/// # Errors
///
/// Returns [`BlurhashError::InvalidCharacter`] if `text` contains a character
/// outside the alphabet.
///
/// ```
/// use blurhash_codec::base83::decode;
/// assert_eq!(decode("10").unwrap(), 83);
/// assert!(decode("1 0").is_err());
/// ```
pub fn decode(text: &str) -> Result<u64, BlurhashError> {
    text.char_indices().try_fold(0u64, |value, (position, character)| {
        let value_of = character
            .is_ascii()
            .then(|| digit(character as u8))
            .flatten()
            .ok_or(BlurhashError::InvalidCharacter {
                character,
                position,
            })?;
        Ok(value.wrapping_mul(83).wrapping_add(u64::from(value_of)))
    })
}

/// Append exactly `length` base83 digits of `value` to `out`.
///
/// The caller keeps `value` below `83^length`; any higher digits are dropped.
pub fn encode_into(value: u64, length: usize, out: &mut String) {
    let mut digits = vec![ALPHABET[0]; length];
    let mut remaining = value;
    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(remaining % 83) as usize];
        remaining /= 83;
    }
    out.extend(digits.iter().map(|&byte| byte as char));
}

/// Encode `value` as exactly `length` base83 digits.
///
/// ```
/// use blurhash_codec::base83::encode;
/// assert_eq!(encode(83, 2), "10");
/// assert_eq!(encode(1, 4), "0001");
/// // Out of range values lose their high digits.
/// assert_eq!(encode(83, 1), "0");
/// ```
pub fn encode(value: u64, length: usize) -> String {
    let mut out = String::with_capacity(length);
    encode_into(value, length, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn every_alphabet_character_decodes_to_its_index() {
        for (index, &byte) in ALPHABET.iter().enumerate() {
            let text = (byte as char).to_string();
            assert_eq!(decode(&text).unwrap(), index as u64);
            assert_eq!(encode(index as u64, 1), text);
        }
    }

    #[test]
    fn alphabet_is_the_blurhash_alphabet() {
        assert_eq!(
            std::str::from_utf8(ALPHABET).unwrap(),
            "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz#$%*+,-.:;=?@[]^_{|}~"
        );
        assert_eq!(decode("{").unwrap(), 79);
        assert_eq!(decode("|").unwrap(), 80);
    }

    #[test]
    fn alphabet_has_no_duplicates() {
        let mut seen = [false; 128];
        for &byte in ALPHABET {
            assert!(!seen[byte as usize], "duplicate {:?}", byte as char);
            seen[byte as usize] = true;
        }
    }

    #[test]
    fn encode_pads_with_zero_digit() {
        assert_eq!(encode(0, 4), "0000");
        assert_eq!(encode(82, 2), "0~");
        assert_eq!(encode(0, 0), "");
    }

    #[test]
    fn encode_into_appends() {
        let mut out = String::from("ab");
        encode_into(83 * 83 - 1, 2, &mut out);
        assert_eq!(out, "ab~~");
    }

    #[test]
    fn encode_truncates_high_digits() {
        assert_eq!(encode(83 * 83 + 5, 2), "05");
    }

    #[test]
    fn decode_reports_position_of_bad_character() {
        assert_eq!(
            decode("00\n0"),
            Err(BlurhashError::InvalidCharacter {
                character: '\n',
                position: 2
            })
        );
        assert_eq!(
            decode("é"),
            Err(BlurhashError::InvalidCharacter {
                character: 'é',
                position: 0
            })
        );
    }

    #[test]
    fn validate_accepts_known_hash() {
        assert!(validate("LEHV6nWB2yk8pyo0adR*.7kCMdnj").is_ok());
        assert!(validate("LEHV6nWB2yk8 pyo0adR*.7kCMdnj").is_err());
    }

    #[test]
    fn digit_rejects_high_bytes() {
        assert_eq!(digit(200), None);
        assert_eq!(digit(b'"'), None);
    }

    proptest! {
        #[test]
        fn roundtrip((length, value) in (1usize..=9).prop_flat_map(|n| (Just(n), 0..83u64.pow(n as u32)))) {
            let encoded = encode(value, length);
            prop_assert_eq!(encoded.len(), length);
            prop_assert_eq!(decode(&encoded).unwrap(), value);
        }
    }
}
