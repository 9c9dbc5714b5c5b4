pub mod create2;
pub mod hook_flags;
pub mod keccak;
pub mod pool_key;
