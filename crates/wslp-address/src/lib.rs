//! Address syntax rules for both sides of the return route.
//!
//! - **EVM** (source chain): 20-byte hex addresses, EIP-55 checksum enforced
//!   whenever the input mixes upper and lower case.
//! - **CashAddr** (destination chain): `simpleledger:`-style base32 addresses
//!   with the 40-bit polymod checksum.
//!
//! Rules are pure and never panic. They only answer "does this look like an
//! address of that chain"; whether the bridge accepts it is decided elsewhere.

mod cashaddr;
mod evm;

pub use cashaddr::{CashAddr, decode_cashaddr, SLP_PREFIX};
pub use evm::{keccak256, parse_evm_address, to_checksum_address};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("invalid address length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("address contains non-hex characters")]
    InvalidHex,
    #[error("address checksum does not match its letter case")]
    ChecksumMismatch,
    #[error("address mixes upper and lower case")]
    MixedCase,
    #[error("unexpected address prefix: expected {expected}, got {actual}")]
    WrongPrefix { expected: String, actual: String },
    #[error("invalid base32 character {0:?}")]
    InvalidCharacter(char),
    #[error("payload too short")]
    TooShort,
    #[error("invalid cashaddr checksum")]
    InvalidChecksum,
    #[error("non-zero padding in payload")]
    InvalidPadding,
    #[error("invalid version byte {0:#04x}")]
    InvalidVersion(u8),
    #[error("hash length does not match version: expected {expected}, got {actual}")]
    HashLength { expected: usize, actual: usize },
}

/// Syntax check for one chain's address format.
pub trait AddressRule {
    fn chain(&self) -> &str;
    fn is_valid_address(&self, text: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EvmAddressRule;

impl AddressRule for EvmAddressRule {
    fn chain(&self) -> &str {
        "evm"
    }

    fn is_valid_address(&self, text: &str) -> bool {
        parse_evm_address(text).is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct CashAddrRule {
    prefix: String,
}

impl CashAddrRule {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_ascii_lowercase(),
        }
    }

    pub fn simpleledger() -> Self {
        Self::new(SLP_PREFIX)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for CashAddrRule {
    fn default() -> Self {
        Self::simpleledger()
    }
}

impl AddressRule for CashAddrRule {
    fn chain(&self) -> &str {
        &self.prefix
    }

    fn is_valid_address(&self, text: &str) -> bool {
        decode_cashaddr(text, &self.prefix).is_ok()
    }
}
