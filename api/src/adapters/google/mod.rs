//! Google identity adapter

mod verifier;

pub use verifier::GoogleTokeninfoVerifier;
