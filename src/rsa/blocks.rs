// Block Encoding
// Base-1000 packing of characters into integers and the ciphertext wire format

use log::warn;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use super::bigint::{from_u64, RsaBigInt};
use crate::error::{CipherError, Result};

/// Each character occupies three decimal digits of a block
pub const BLOCK_BASE: u32 = 1000;

/// value = Σ code_i * 1000^(k-1-i), first character most significant
pub fn pack_block(chars: &[char]) -> RsaBigInt {
    chars.iter().fold(RsaBigInt::zero(), |acc, &c| {
        let code = u32::from(c);
        if code >= BLOCK_BASE {
            warn!("character U+{:04X} does not fit a base-1000 digit; block will not round-trip", code);
        }
        acc * BLOCK_BASE + code
    })
}

/// Split a message into groups of `block_size` characters and pack each group.
/// The final group may be shorter.
pub fn pack_message(message: &str, block_size: usize) -> Result<Vec<RsaBigInt>> {
    if block_size == 0 {
        return Err(CipherError::InvalidBlockSize(block_size));
    }

    let chars: Vec<char> = message.chars().collect();
    Ok(chars.chunks(block_size).map(pack_block).collect())
}

/// Unpack exactly `block_size` characters, lowest digits last.
///
/// A block packed from fewer characters comes back with leading '\0'.
pub fn unpack_block(value: &RsaBigInt, block_size: usize) -> String {
    let base = from_u64(u64::from(BLOCK_BASE));
    let mut rest = value.clone();
    let mut chars = Vec::with_capacity(block_size);

    for _ in 0..block_size {
        let (quotient, digit) = rest.div_rem(&base);
        let c = digit
            .to_u32()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        chars.push(c);
        rest = quotient;
    }

    chars.iter().rev().collect()
}

pub fn unpack_blocks(blocks: &[RsaBigInt], block_size: usize) -> String {
    blocks.iter().map(|b| unpack_block(b, block_size)).collect()
}

/// Decimal blocks joined by single spaces
pub fn format_ciphertext(blocks: &[RsaBigInt]) -> String {
    blocks
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split on whitespace and parse every token as a decimal integer
pub fn parse_ciphertext(text: &str) -> Result<Vec<RsaBigInt>> {
    text.split_whitespace()
        .map(|token| {
            token
                .parse::<RsaBigInt>()
                .map_err(|_| CipherError::InvalidCiphertext(token.to_string()))
        })
        .collect()
}
