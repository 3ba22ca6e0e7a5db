//! # RSA Block Cipher
//!
//! RSA key generation and a block cipher built on textbook RSA, written from
//! big-integer arithmetic alone:
//!
//! - probable primes from random odd candidates, a small-prime pre-filter and
//!   20 rounds of Miller-Rabin
//! - key pairs with a randomly chosen public exponent and its inverse from the
//!   Extended Euclidean Algorithm
//! - messages packed three decimal digits per character into blocks, encrypted
//!   in ECB or CBC mode and exchanged as space-separated decimal integers
//!
//! The scheme is deterministic per block in ECB mode and is not meant to be
//! secure.
//!
//! ## Example
//!
//! ```rust
//! use rsa_block_cipher::{CipherConfig, EncryptionSession, MemoryKeyStore, Mode};
//! use rsa_block_cipher::keystore::save_keypair;
//! use rsa_block_cipher::rsa::bigint::from_u64;
//! use rsa_block_cipher::rsa::derive_keypair;
//!
//! let mut store = MemoryKeyStore::new();
//! let keypair = derive_keypair(&from_u64(1009), &from_u64(1013), &from_u64(17)).unwrap();
//! save_keypair(&mut store, &keypair).unwrap();
//!
//! let config = CipherConfig::default().with_mode(Mode::Cbc).with_block_size(1);
//! let session = EncryptionSession::new(store, config).with_iv(7u64.into());
//!
//! let ciphertext = session.encrypt("hi").unwrap().into_text().unwrap();
//! let message = session.decrypt(&ciphertext).unwrap().into_text().unwrap();
//! assert_eq!(message, "hi");
//! ```

pub mod config;
pub mod error;
pub mod keystore;
pub mod rsa;
pub mod session;
pub mod util;

pub use config::{CipherConfig, KeyGenConfig, StoreConfig};
pub use error::{CipherError, Result};
pub use keystore::{FileKeyStore, KeyStore, MemoryKeyStore};
pub use rsa::{CancelToken, CipherOutput, KeyPair, KeyRole, Mode, RsaKey, SearchControl, SieveMode};
pub use session::{EncryptionSession, ModeUpdate};
