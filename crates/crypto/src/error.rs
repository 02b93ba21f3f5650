// Path: crates/crypto/src/error.rs
pub use sbx_api::error::CryptoError;
