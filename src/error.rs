//! Error types for key generation, key storage and the block cipher

use std::io;

use thiserror::Error;

use crate::rsa::keygen::KeyRole;

pub type Result<T> = std::result::Result<T, CipherError>;

#[derive(Error, Debug)]
pub enum CipherError {
    #[error("{role} key not found at {location}")]
    KeyNotFound { role: KeyRole, location: String },

    #[error("Malformed key record (line {line}): {reason}")]
    KeyFormat { line: usize, reason: String },

    #[error("Invalid ciphertext block: {0:?}")]
    InvalidCiphertext(String),

    #[error("Invalid block size: {0} (must be at least 1)")]
    InvalidBlockSize(usize),

    #[error("Invalid prime bit length: {0} (must be at least 3)")]
    InvalidBitLength(u64),

    #[error("Public exponent has no inverse modulo the totient")]
    NoModularInverse,

    #[error("Search cancelled")]
    Cancelled,

    #[error("Search exhausted after {attempts} attempts")]
    SearchExhausted { attempts: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
