use ethers::abi::{self, Token};
use ethers::types::{Address, H256, U256};

use crate::chain::keccak::keccak256;

/// CREATE2 address: low 20 bytes of keccak256(0xff ‖ deployer ‖ salt ‖ init_code_hash).
pub fn derive_address(deployer: Address, salt: H256, init_code_hash: H256) -> Address {
    let mut buf = [0u8; 85];
    buf[0] = 0xff;
    buf[1..21].copy_from_slice(deployer.as_bytes());
    buf[21..53].copy_from_slice(salt.as_bytes());
    buf[53..85].copy_from_slice(init_code_hash.as_bytes());

    let hash = keccak256(buf);
    Address::from_slice(&hash.as_bytes()[12..])
}

/// Big-endian 32-byte encoding of a miner nonce.
pub fn format_salt(nonce: U256) -> H256 {
    let mut bytes = [0u8; 32];
    nonce.to_big_endian(&mut bytes);
    H256::from(bytes)
}

/// Contract creation code: bytecode followed by the ABI-encoded address arguments
/// (`poolManager`, `treasury`, `stablecoin`, ... in constructor order).
pub fn init_code(bytecode: &[u8], constructor_args: &[Address]) -> Vec<u8> {
    let tokens: Vec<Token> = constructor_args.iter().copied().map(Token::Address).collect();
    let encoded = abi::encode(&tokens);

    let mut code = Vec::with_capacity(bytecode.len() + encoded.len());
    code.extend_from_slice(bytecode);
    code.extend_from_slice(&encoded);
    code
}

pub fn init_code_hash(bytecode: &[u8], constructor_args: &[Address]) -> H256 {
    keccak256(init_code(bytecode, constructor_args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::keccak::{parse_address, to_hex_string};
    use ethers::utils::get_create2_address_from_hash;

    // EIP-1014 example 0: deployer 0x00..00, salt 0x00..00, init code 0x00
    #[test]
    fn eip1014_example_zero() {
        let hash = keccak256([0x00u8]);
        let addr = derive_address(Address::zero(), H256::zero(), hash);
        assert_eq!(addr, parse_address("0x4D1A2e2bB4F88F0250f26Ffff098B0b30B26BF38").unwrap());
    }

    // EIP-1014 example 1: deployer 0xdeadbeef00..00
    #[test]
    fn eip1014_example_one() {
        let deployer = parse_address("0xdeadbeef00000000000000000000000000000000").unwrap();
        let addr = derive_address(deployer, H256::zero(), keccak256([0x00u8]));
        assert_eq!(addr, parse_address("0xB928f69Bb1D91Cd65274e3c79d8986362984fDA3").unwrap());
    }

    #[test]
    fn matches_ethers_create2_helper() {
        let deployer = parse_address("0x4e59b44847b379578588920cA78FbF26c0B4956C").unwrap();
        let hash = keccak256(b"hook bytecode");
        for n in [0u64, 1, 7, 5_000, u64::MAX] {
            let salt = format_salt(U256::from(n));
            let expected = get_create2_address_from_hash(deployer, salt.as_bytes(), hash.as_bytes());
            assert_eq!(derive_address(deployer, salt, hash), expected, "nonce {}", n);
        }
    }

    #[test]
    fn single_byte_change_moves_the_address() {
        let deployer = Address::from_low_u64_be(1);
        let hash = keccak256(b"init");
        let base = derive_address(deployer, format_salt(U256::one()), hash);

        assert_eq!(base, derive_address(deployer, format_salt(U256::one()), hash));
        assert_ne!(base, derive_address(Address::from_low_u64_be(2), format_salt(U256::one()), hash));
        assert_ne!(base, derive_address(deployer, format_salt(U256::from(2)), hash));

        let mut flipped = hash;
        flipped.0[31] ^= 0x01;
        assert_ne!(base, derive_address(deployer, format_salt(U256::one()), flipped));
    }

    #[test]
    fn salt_is_big_endian() {
        let salt = format_salt(U256::one());
        assert_eq!(
            to_hex_string(salt),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
        assert_eq!(&format_salt(U256::from(0x0102u64)).0[30..], &[0x01u8, 0x02]);
    }

    #[test]
    fn init_code_appends_abi_words() {
        let manager = Address::from_low_u64_be(0xaa);
        let stable = Address::from_low_u64_be(0xbb);
        let code = init_code(&[0x60, 0x80], &[manager, stable]);

        assert_eq!(code.len(), 2 + 64);
        assert_eq!(&code[..2], &[0x60, 0x80]);
        assert_eq!(&code[2..14], &[0u8; 12]);
        assert_eq!(&code[14..34], manager.as_bytes());
        assert_eq!(&code[46..66], stable.as_bytes());
        assert_eq!(init_code_hash(&[0x60, 0x80], &[manager, stable]), keccak256(&code));
    }
}
