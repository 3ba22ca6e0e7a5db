// RSA Module - Main module file
// Exports key generation and the ECB/CBC block cipher

pub mod bigint;
pub mod blocks;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod mode;
pub mod prime;
pub mod search;

pub use decrypt::{decrypt_blocks, decrypt_message};
pub use encrypt::{encrypt_blocks, encrypt_message, CipherOutput};
pub use keygen::{derive_keypair, generate_keypair, KeyPair, KeyRole, RsaKey};
pub use mode::{InitVector, Mode};
pub use prime::{PrimalityOracle, SieveMode};
pub use search::{CancelToken, SearchControl};
