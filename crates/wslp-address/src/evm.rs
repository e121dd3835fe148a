use tiny_keccak::{Hasher, Keccak};

use crate::AddressError;

const HEX_LEN: usize = 40;

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Parse a 20-byte EVM address, with or without the `0x` prefix.
///
/// Single-case input is accepted as-is. Mixed-case input is treated as an
/// EIP-55 checksum and must match exactly.
pub fn parse_evm_address(addr: &str) -> Result<[u8; 20], AddressError> {
    if addr.is_empty() {
        return Err(AddressError::Empty);
    }

    let hex_str = addr.strip_prefix("0x").unwrap_or(addr);

    if hex_str.len() != HEX_LEN {
        return Err(AddressError::InvalidLength {
            expected: HEX_LEN,
            actual: hex_str.len(),
        });
    }

    if !hex_str.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressError::InvalidHex);
    }

    let bytes = hex::decode(hex_str).map_err(|_| AddressError::InvalidHex)?;
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&bytes);

    if is_mixed_case(hex_str) && to_checksum_address(&raw)[2..] != *hex_str {
        return Err(AddressError::ChecksumMismatch);
    }

    Ok(raw)
}

/// EIP-55 checksummed representation with `0x` prefix.
pub fn to_checksum_address(raw: &[u8; 20]) -> String {
    let lower = hex::encode(raw);
    let hash = keccak256(lower.as_bytes());

    let mut output = String::with_capacity(2 + HEX_LEN);
    output.push_str("0x");
    for (index, ch) in lower.chars().enumerate() {
        let byte = hash[index / 2];
        let nibble = if index % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            output.push(ch.to_ascii_uppercase());
        } else {
            output.push(ch);
        }
    }
    output
}

fn is_mixed_case(hex_str: &str) -> bool {
    let has_upper = hex_str.bytes().any(|b| matches!(b, b'A'..=b'F'));
    let has_lower = hex_str.bytes().any(|b| matches!(b, b'a'..=b'f'));
    has_upper && has_lower
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn eip55_reference_addresses() {
        for addr in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        ] {
            let raw = parse_evm_address(addr).unwrap();
            assert_eq!(to_checksum_address(&raw), addr);
        }
    }

    #[test]
    fn wrong_checksum_is_rejected() {
        // last letter flipped to lowercase
        let addr = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD";
        assert_eq!(
            parse_evm_address(addr),
            Err(AddressError::ChecksumMismatch)
        );
    }

    #[test]
    fn single_case_skips_checksum() {
        assert!(parse_evm_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_ok());
        assert!(parse_evm_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").is_ok());
        assert!(parse_evm_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_ok());
    }

    #[test]
    fn checksum_of_repeated_a() {
        let raw = parse_evm_address(&format!("0x{}", "a".repeat(40))).unwrap();
        assert_eq!(raw, [0xaa; 20]);
        assert_eq!(
            to_checksum_address(&raw),
            "0xaAaAaAaaAaAaAaaAaAAAAAAAAaaaAaAaAaaAaaAa"
        );
    }

    #[test]
    fn malformed_inputs() {
        assert_eq!(parse_evm_address(""), Err(AddressError::Empty));
        assert_eq!(
            parse_evm_address("0x1234"),
            Err(AddressError::InvalidLength {
                expected: 40,
                actual: 4
            })
        );
        assert_eq!(
            parse_evm_address(&format!("0x{}", "g".repeat(40))),
            Err(AddressError::InvalidHex)
        );
        // an uppercase prefix is not a prefix
        assert!(parse_evm_address(&format!("0X{}", "a".repeat(40))).is_err());
        // surrounding whitespace is not trimmed
        assert!(parse_evm_address(&format!(" 0x{}", "a".repeat(40))).is_err());
    }
}
