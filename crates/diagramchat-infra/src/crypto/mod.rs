//! Cryptographic helpers.

pub mod signer;
