// RSA Block Encryption
// Packs a message into base-1000 blocks and encrypts them in ECB or CBC mode

use log::{debug, warn};

use super::bigint::{mod_pow, xor, RsaBigInt};
use super::blocks::{format_ciphertext, pack_message};
use super::keygen::RsaKey;
use super::mode::{InitVector, Mode};
use crate::config::CipherConfig;
use crate::error::Result;

/// Result of an encrypt or decrypt call.
///
/// Empty input is not an error: it yields `Empty` instead of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherOutput {
    Empty,
    Text(String),
}

impl CipherOutput {
    pub fn is_empty(&self) -> bool {
        matches!(self, CipherOutput::Empty)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            CipherOutput::Empty => None,
            CipherOutput::Text(text) => Some(text),
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            CipherOutput::Empty => None,
            CipherOutput::Text(text) => Some(text),
        }
    }
}

fn warn_if_not_invertible(value: &RsaBigInt, key: &RsaKey, index: usize) {
    if *value >= key.modulus {
        warn!(
            "block {} is not below the modulus ({} >= {} bits); it will not decrypt correctly",
            index,
            value.bits(),
            key.bit_length()
        );
    }
}

/// c_i = b_i^e mod n, every block on its own
pub fn encrypt_ecb(blocks: &[RsaBigInt], key: &RsaKey) -> Vec<RsaBigInt> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            warn_if_not_invertible(block, key, i);
            mod_pow(block, &key.exponent, &key.modulus)
        })
        .collect()
}

/// c_i = (b_i XOR c_{i-1})^e mod n, with c_{-1} = IV
pub fn encrypt_cbc(blocks: &[RsaBigInt], key: &RsaKey, iv: &InitVector) -> Vec<RsaBigInt> {
    let mut feedback = iv.value().clone();
    let mut ciphertext = Vec::with_capacity(blocks.len());

    for (i, block) in blocks.iter().enumerate() {
        let mixed = xor(block, &feedback);
        warn_if_not_invertible(&mixed, key, i);

        let encrypted = mod_pow(&mixed, &key.exponent, &key.modulus);
        feedback = encrypted.clone();
        ciphertext.push(encrypted);
    }

    ciphertext
}

pub fn encrypt_blocks(blocks: &[RsaBigInt], key: &RsaKey, mode: Mode, iv: &InitVector) -> Vec<RsaBigInt> {
    match mode {
        Mode::Ecb => encrypt_ecb(blocks, key),
        Mode::Cbc => encrypt_cbc(blocks, key, iv),
    }
}

/// Encrypt a message with a public key.
/// Returns space-separated decimal ciphertext blocks.
pub fn encrypt_message(
    message: &str,
    key: &RsaKey,
    config: &CipherConfig,
    iv: &InitVector,
) -> Result<CipherOutput> {
    if message.is_empty() {
        return Ok(CipherOutput::Empty);
    }

    let blocks = pack_message(message, config.block_size)?;
    debug!(
        "encrypting {} blocks of {} characters in {} mode",
        blocks.len(),
        config.block_size,
        config.mode
    );

    let ciphertext = encrypt_blocks(&blocks, key, config.mode, iv);
    Ok(CipherOutput::Text(format_ciphertext(&ciphertext)))
}
