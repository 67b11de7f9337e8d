//! CLI command implementations for authtoken.

pub mod token;
