//! IFC-style compressed GUIDs.
//!
//! IFC identifies every entity by a 128-bit UUID compressed into 22
//! characters over a base-64 alphabet specific to the schema. Elements
//! imported from a model keep their original identifiers; tasks and cost
//! items created by the pipeline get fresh ones from here.

use uuid::Uuid;

const ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Generates a new 22-character IFC GUID from a random v4 UUID.
#[must_use]
pub fn new_guid() -> String {
    compress(Uuid::new_v4().as_u128())
}

/// Compresses a 128-bit value into the 22-character IFC base-64 form.
///
/// The first character encodes the top 2 bits, every following character
/// encodes 6 bits, most significant first.
#[must_use]
pub fn compress(mut value: u128) -> String {
    let mut out = [0u8; 22];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x3f) as usize];
        value >>= 6;
    }
    // ALPHABET is ASCII, so the buffer is valid UTF-8
    String::from_utf8(out.to_vec()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_is_22_chars_from_alphabet() {
        let guid = new_guid();
        assert_eq!(guid.len(), 22);
        assert!(guid.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn compress_zero() {
        assert_eq!(compress(0), "0000000000000000000000");
    }

    #[test]
    fn compress_is_big_endian() {
        // 1 lands in the last character
        assert_eq!(compress(1), "0000000000000000000001");
        // 64 shifts one position left
        assert_eq!(compress(64), "0000000000000000000010");
    }

    #[test]
    fn first_char_covers_top_two_bits() {
        // Max value: top character is limited to 2 bits -> '3'
        assert_eq!(compress(u128::MAX), "3$$$$$$$$$$$$$$$$$$$$$");
    }

    #[test]
    fn guids_are_unique() {
        let a = new_guid();
        let b = new_guid();
        assert_ne!(a, b);
    }
}
