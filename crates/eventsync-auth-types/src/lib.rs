//! Auth types shared across the EventSync workspace.
//!
//! Provides JWT validation and the bearer-token `Identity` extractor.
//! Token *issuance* lives in the api service — it is the sole issuer.

pub mod identity;
pub mod token;
