//! Infrastructure - configuration, randomness and file input.

pub mod config;
pub mod input;
pub mod random;
