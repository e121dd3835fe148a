use crate::AddressError;

pub const SLP_PREFIX: &str = "simpleledger";

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const CHECKSUM_LEN: usize = 8;
const HASH_SIZES: [usize; 8] = [20, 24, 28, 32, 40, 48, 56, 64];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashAddr {
    pub prefix: String,
    /// Type bits of the version byte (0 = P2PKH, 1 = P2SH).
    pub address_type: u8,
    pub hash: Vec<u8>,
}

/// Decode a cashaddr string against the expected prefix.
///
/// The prefix may be omitted, in which case `expected_prefix` is assumed for
/// the checksum. Either case is accepted, but not both in one string.
pub fn decode_cashaddr(addr: &str, expected_prefix: &str) -> Result<CashAddr, AddressError> {
    if addr.is_empty() {
        return Err(AddressError::Empty);
    }

    let has_upper = addr.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = addr.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower {
        return Err(AddressError::MixedCase);
    }

    let lowered = addr.to_ascii_lowercase();
    let expected_prefix = expected_prefix.to_ascii_lowercase();
    let (prefix, payload) = match lowered.rsplit_once(':') {
        Some((prefix, payload)) => (prefix.to_owned(), payload),
        None => (expected_prefix.clone(), lowered.as_str()),
    };

    if prefix != expected_prefix {
        return Err(AddressError::WrongPrefix {
            expected: expected_prefix,
            actual: prefix,
        });
    }

    let values = payload
        .chars()
        .map(|ch| {
            CHARSET
                .iter()
                .position(|&c| c as char == ch)
                .map(|pos| pos as u8)
                .ok_or(AddressError::InvalidCharacter(ch))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if values.len() <= CHECKSUM_LEN {
        return Err(AddressError::TooShort);
    }

    let mut checksum_input: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    checksum_input.push(0);
    checksum_input.extend_from_slice(&values);
    if polymod(&checksum_input) != 0 {
        return Err(AddressError::InvalidChecksum);
    }

    let data = from_base32(&values[..values.len() - CHECKSUM_LEN])?;
    let Some((&version, hash)) = data.split_first() else {
        return Err(AddressError::TooShort);
    };

    if version & 0x80 != 0 {
        return Err(AddressError::InvalidVersion(version));
    }

    let expected = HASH_SIZES[(version & 0x07) as usize];
    if hash.len() != expected {
        return Err(AddressError::HashLength {
            expected,
            actual: hash.len(),
        });
    }

    Ok(CashAddr {
        prefix,
        address_type: version >> 3,
        hash: hash.to_vec(),
    })
}

fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for &d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(d);
        if c0 & 0x01 != 0 {
            c ^= 0x98_f2bc_8e61;
        }
        if c0 & 0x02 != 0 {
            c ^= 0x79_b76d_99e2;
        }
        if c0 & 0x04 != 0 {
            c ^= 0xf3_3e5f_b3c4;
        }
        if c0 & 0x08 != 0 {
            c ^= 0xae_2eab_e2a8;
        }
        if c0 & 0x10 != 0 {
            c ^= 0x1e_4f43_e470;
        }
    }
    c ^ 1
}

/// Regroup 5-bit values into bytes; leftover bits must be fewer than five
/// and all zero.
fn from_base32(values: &[u8]) -> Result<Vec<u8>, AddressError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut output = Vec::with_capacity(values.len() * 5 / 8);

    for &value in values {
        acc = (acc << 5) | u32::from(value);
        bits += 5;
        while bits >= 8 {
            bits -= 8;
            output.push((acc >> bits) as u8);
        }
        acc &= (1 << bits) - 1;
    }

    if bits >= 5 || acc != 0 {
        return Err(AddressError::InvalidPadding);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLP_P2PKH: &str = "simpleledger:qpm2qsznhks23z7629mms6s4cwef74vcwvg3pncxyr";
    const SLP_P2SH: &str = "simpleledger:ppm2qsznhks23z7629mms6s4cwef74vcwvl5uul9l7";
    const BCH_P2PKH: &str = "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a";

    #[test]
    fn decodes_known_bitcoincash_vector() {
        let decoded = decode_cashaddr(BCH_P2PKH, "bitcoincash").unwrap();
        assert_eq!(decoded.prefix, "bitcoincash");
        assert_eq!(decoded.address_type, 0);
        assert_eq!(
            hex::encode(&decoded.hash),
            "76a04053bda0a88bda5177b86a15c3b29f559873"
        );
    }

    #[test]
    fn same_hash_under_slp_prefix() {
        let slp = decode_cashaddr(SLP_P2PKH, SLP_PREFIX).unwrap();
        let bch = decode_cashaddr(BCH_P2PKH, "bitcoincash").unwrap();
        assert_eq!(slp.hash, bch.hash);

        let p2sh = decode_cashaddr(SLP_P2SH, SLP_PREFIX).unwrap();
        assert_eq!(p2sh.address_type, 1);
    }

    #[test]
    fn prefix_may_be_omitted() {
        let payload = SLP_P2PKH.trim_start_matches("simpleledger:");
        assert!(decode_cashaddr(payload, SLP_PREFIX).is_ok());
        // the implied prefix takes part in the checksum
        assert_eq!(
            decode_cashaddr(payload, "bitcoincash"),
            Err(AddressError::InvalidChecksum)
        );
    }

    #[test]
    fn uppercase_accepted_mixed_case_rejected() {
        assert!(decode_cashaddr(&SLP_P2PKH.to_ascii_uppercase(), SLP_PREFIX).is_ok());

        let mixed = SLP_P2PKH.replacen("qpm2", "QPM2", 1);
        assert_eq!(
            decode_cashaddr(&mixed, SLP_PREFIX),
            Err(AddressError::MixedCase)
        );
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let corrupted = "simpleledger:qpm2qsznhks23z7629mms6s4cwef74vcwvg3pncxyq";
        assert_eq!(
            decode_cashaddr(corrupted, SLP_PREFIX),
            Err(AddressError::InvalidChecksum)
        );
    }

    #[test]
    fn wrong_prefix_and_bad_characters() {
        assert!(matches!(
            decode_cashaddr(BCH_P2PKH, SLP_PREFIX),
            Err(AddressError::WrongPrefix { .. })
        ));
        assert_eq!(
            decode_cashaddr("simpleledger:qpm2qsznhks23z7629mms6s4cwef74vcwvg3pncxyb", SLP_PREFIX),
            Err(AddressError::InvalidCharacter('b'))
        );
        assert_eq!(
            decode_cashaddr("simpleledger:qpzry9x8", SLP_PREFIX),
            Err(AddressError::TooShort)
        );
    }
}
