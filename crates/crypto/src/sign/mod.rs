// Path: crates/crypto/src/sign/mod.rs

pub mod batch;
pub mod eddsa;
pub mod session;
