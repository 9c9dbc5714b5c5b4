pub mod miner;
pub mod parallel;
pub mod service;
pub mod task;
