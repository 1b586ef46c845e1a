// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use aws_lc_rs::digest::{SHA256, digest};
use aws_lc_rs::error::Unspecified;
use data_encoding::{BASE64, HEXLOWER};

/// Lower-case hex SHA-256 digest of `data`.
#[inline]
pub fn sha256_hex(data: &[u8]) -> String {
    HEXLOWER.encode(digest(&SHA256, data).as_ref())
}

/// Random alphanumeric string of at most `max_length` characters.
///
/// `max_length` random bytes are base64 encoded and stripped of anything that
/// is not `[A-Za-z0-9]`, so the result is usually, but not always, exactly
/// `max_length` long.
pub fn random_value(max_length: usize) -> Result<String, Unspecified> {
    let mut bytes = vec![0u8; max_length];
    aws_lc_rs::rand::fill(&mut bytes)?;

    Ok(BASE64
        .encode(&bytes)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(max_length)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_hex_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_random_value_is_alphanumeric_and_bounded() {
        let value = random_value(32).unwrap();
        assert!(!value.is_empty());
        assert!(value.len() <= 32);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_value_differs_between_calls() {
        assert_ne!(random_value(32).unwrap(), random_value(32).unwrap());
    }

    #[test]
    fn test_random_value_zero_length() {
        assert_eq!(random_value(0).unwrap(), "");
    }
}
