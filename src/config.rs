// Configuration for key generation, the block cipher and key storage

use std::path::PathBuf;

use crate::rsa::mode::Mode;
use crate::rsa::prime::{SieveMode, MILLER_RABIN_ROUNDS};

/// Default characters per block
pub const DEFAULT_BLOCK_SIZE: usize = 32;

/// Default bit length of each prime factor
pub const DEFAULT_PRIME_BITS: u64 = 1024;

/// Block cipher settings passed to every encrypt/decrypt call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CipherConfig {
    pub mode: Mode,
    pub block_size: usize,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Ecb,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl CipherConfig {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }
}

/// Key pair generation settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    pub prime_bits: u64,
    pub miller_rabin_rounds: u32,
    pub sieve: SieveMode,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            prime_bits: DEFAULT_PRIME_BITS,
            miller_rabin_rounds: MILLER_RABIN_ROUNDS,
            sieve: SieveMode::FirstDivisorOnly,
        }
    }
}

impl KeyGenConfig {
    pub fn with_prime_bits(mut self, bits: u64) -> Self {
        self.prime_bits = bits;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    pub fn with_sieve(mut self, sieve: SieveMode) -> Self {
        self.sieve = sieve;
        self
    }
}

/// Location of the key records for a file-backed store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub directory: PathBuf,
    pub public_file: String,
    pub private_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./data"),
            public_file: "public_key.txt".to_string(),
            private_file: "private_key.txt".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn public_path(&self) -> PathBuf {
        self.directory.join(&self.public_file)
    }

    pub fn private_path(&self) -> PathBuf {
        self.directory.join(&self.private_file)
    }
}
