//! Test utilities for the EventSync service.
//!
//! Provides `TestIdentity` for minting bearer tokens in tests.
//! Import in `#[cfg(test)]` blocks or `tests/` targets only — never in
//! production code.

pub mod auth;
