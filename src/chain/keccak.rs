use std::str::FromStr;

use ethers::types::{Address, H256};
use ethers::utils;

use crate::error::DeployError;

/// Keccak-256 as used by the EVM (original Keccak padding, not NIST SHA3-256).
#[inline]
pub fn keccak256(bytes: impl AsRef<[u8]>) -> H256 {
    H256::from(utils::keccak256(bytes))
}

/// Lowercase `0x`-prefixed rendering with every digit kept (`Display` on H160/H256 elides the middle).
pub fn to_hex_string(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Accepts `0x`-prefixed or bare hex in any letter case.
pub fn parse_address(input: &str) -> Result<Address, DeployError> {
    let trimmed = input.trim();
    let digits = strip_hex_prefix(trimmed);
    if digits.len() != 40 {
        return Err(DeployError::InvalidAddress(trimmed.to_string()));
    }
    Address::from_str(digits).map_err(|_| DeployError::InvalidAddress(trimmed.to_string()))
}

pub fn parse_hash(input: &str) -> Result<H256, DeployError> {
    let trimmed = input.trim();
    let digits = strip_hex_prefix(trimmed);
    if digits.len() != 64 {
        return Err(DeployError::InvalidHex(trimmed.to_string()));
    }
    H256::from_str(digits).map_err(|_| DeployError::InvalidHex(trimmed.to_string()))
}

/// Raw byte strings such as contract bytecode. An empty string decodes to no bytes.
pub fn parse_hex_bytes(input: &str) -> Result<Vec<u8>, DeployError> {
    let trimmed = input.trim();
    hex::decode(strip_hex_prefix(trimmed)).map_err(|e| DeployError::InvalidHex(format!("{}: {}", trimmed, e)))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}
