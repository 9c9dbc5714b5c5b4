// lib.rs - Library exports for the binary and integration tests

pub mod bootstrap;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod math;
pub mod models;

pub use error::{DeployError, Error, MathError, MinerError};
