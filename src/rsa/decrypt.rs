// RSA Block Decryption
// Reverses encrypt: parse the decimal blocks, exponentiate, undo the chaining and unpack

use log::debug;

use super::bigint::{mod_pow, xor, RsaBigInt};
use super::blocks::{parse_ciphertext, unpack_blocks};
use super::encrypt::CipherOutput;
use super::keygen::RsaKey;
use super::mode::{InitVector, Mode};
use crate::config::CipherConfig;
use crate::error::{CipherError, Result};

/// b_i = c_i^d mod n
pub fn decrypt_ecb(blocks: &[RsaBigInt], key: &RsaKey) -> Vec<RsaBigInt> {
    blocks
        .iter()
        .map(|block| mod_pow(block, &key.exponent, &key.modulus))
        .collect()
}

/// m_i = (c_i^d mod n) XOR c_{i-1}, with c_{-1} = IV.
/// Feedback is always the ciphertext block, never the recovered plaintext.
pub fn decrypt_cbc(blocks: &[RsaBigInt], key: &RsaKey, iv: &InitVector) -> Vec<RsaBigInt> {
    let mut feedback = iv.value();
    let mut plaintext = Vec::with_capacity(blocks.len());

    for block in blocks {
        let decrypted = mod_pow(block, &key.exponent, &key.modulus);
        plaintext.push(xor(&decrypted, feedback));
        feedback = block;
    }

    plaintext
}

pub fn decrypt_blocks(blocks: &[RsaBigInt], key: &RsaKey, mode: Mode, iv: &InitVector) -> Vec<RsaBigInt> {
    match mode {
        Mode::Ecb => decrypt_ecb(blocks, key),
        Mode::Cbc => decrypt_cbc(blocks, key, iv),
    }
}

/// Decrypt space-separated decimal ciphertext with a private key.
///
/// Every block unpacks to exactly `block_size` characters; callers strip
/// the leading '\0' of a short final block themselves.
pub fn decrypt_message(
    ciphertext: &str,
    key: &RsaKey,
    config: &CipherConfig,
    iv: &InitVector,
) -> Result<CipherOutput> {
    if ciphertext.is_empty() {
        return Ok(CipherOutput::Empty);
    }
    if config.block_size == 0 {
        return Err(CipherError::InvalidBlockSize(config.block_size));
    }

    let blocks = parse_ciphertext(ciphertext)?;
    debug!("decrypting {} blocks in {} mode", blocks.len(), config.mode);

    let plaintext = decrypt_blocks(&blocks, key, config.mode, iv);
    Ok(CipherOutput::Text(unpack_blocks(&plaintext, config.block_size)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::encrypt::encrypt_message;
    use crate::rsa::keygen::{derive_keypair, generate_keypair_with, KeyPair};
    use crate::rsa::search::SearchControl;
    use crate::config::KeyGenConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_keypair() -> KeyPair {
        derive_keypair(&from_u64(1009), &from_u64(1013), &from_u64(17)).unwrap()
    }

    fn test_roundtrip(keypair: &KeyPair, config: &CipherConfig, iv: &InitVector, message: &str) -> String {
        let ciphertext = encrypt_message(message, &keypair.public_key, config, iv)
            .unwrap()
            .into_text()
            .unwrap();
        decrypt_message(&ciphertext, &keypair.private_key, config, iv)
            .unwrap()
            .into_text()
            .unwrap()
    }

    #[test]
    fn test_decrypt_hi_ecb() {
        let keypair = test_keypair();
        let iv = InitVector::from(0u64);

        let config = CipherConfig::default().with_block_size(2);
        let out = decrypt_message("258089", &keypair.private_key, &config, &iv).unwrap();
        assert_eq!(out.text(), Some("hi"));

        // a wider block exposes the NUL padding
        let config = CipherConfig::default().with_block_size(4);
        let out = decrypt_message("258089", &keypair.private_key, &config, &iv).unwrap();
        assert_eq!(out.text(), Some("\0\0hi"));
        assert_eq!(out.text().map(|t| t.trim_start_matches('\0')), Some("hi"));
    }

    #[test]
    fn test_decrypt_cbc_vector() {
        let keypair = test_keypair();
        let config = CipherConfig::default().with_mode(Mode::Cbc).with_block_size(2);

        let out = decrypt_message("796707 326448", &keypair.private_key, &config, &InitVector::from(12345u64)).unwrap();
        assert_eq!(out.text(), Some("hihi"));
    }

    #[test]
    fn test_cbc_wrong_iv_corrupts_first_block_only() {
        let keypair = test_keypair();
        let config = CipherConfig::default().with_mode(Mode::Cbc).with_block_size(2);

        let out = decrypt_message("796707 326448", &keypair.private_key, &config, &InitVector::from(12344u64))
            .unwrap()
            .into_text()
            .unwrap();
        assert_ne!(&out[..], "hihi");
        assert!(out.ends_with("hi"));
    }

    #[test]
    fn test_roundtrip_generated_key() {
        let mut rng = StdRng::seed_from_u64(21);
        let keypair = generate_keypair_with(
            &KeyGenConfig::default().with_prime_bits(256),
            &SearchControl::unbounded(),
            &mut rng,
        )
        .unwrap();
        let iv = InitVector::random_with(8, &mut rng);

        let message = "Hello, my name is Piotr and I am a student";
        for mode in [Mode::Ecb, Mode::Cbc] {
            let config = CipherConfig::default().with_mode(mode).with_block_size(8);
            let decrypted = test_roundtrip(&keypair, &config, &iv, message);

            // 42 characters in blocks of 8: the last block carries 6 NULs
            assert_eq!(decrypted.len(), 48);
            assert_eq!(&decrypted[..40], &message[..40]);
            assert_eq!(&decrypted[40..], "\0\0\0\0\0\0nt");
        }
    }

    #[test]
    fn test_roundtrip_exact_multiple_has_no_padding() {
        let keypair = test_keypair();
        let config = CipherConfig::default().with_mode(Mode::Cbc).with_block_size(1);
        let iv = InitVector::from(77u64);

        assert_eq!(test_roundtrip(&keypair, &config, &iv, "abc xyz"), "abc xyz");
    }

    #[test]
    fn test_wide_character_is_not_recovered() {
        let keypair = test_keypair();
        let config = CipherConfig::default().with_block_size(1);
        let iv = InitVector::from(0u64);

        let ciphertext = encrypt_message("\u{4e2d}", &keypair.public_key, &config, &iv).unwrap();
        assert!(matches!(ciphertext, CipherOutput::Text(_)));

        // 20013 keeps only its low three digits: code 13
        let decrypted = test_roundtrip(&keypair, &config, &iv, "\u{4e2d}");
        assert_ne!(decrypted, "\u{4e2d}");
        assert_eq!(decrypted, "\r");
    }

    #[test]
    fn test_block_above_modulus_is_not_recovered() {
        let keypair = test_keypair();
        let config = CipherConfig::default().with_block_size(3);
        let iv = InitVector::from(0u64);

        // 122122122 exceeds the modulus 1022117
        let ciphertext = encrypt_message("zzz", &keypair.public_key, &config, &iv).unwrap();
        assert!(matches!(ciphertext, CipherOutput::Text(_)));
        assert_ne!(test_roundtrip(&keypair, &config, &iv, "zzz"), "zzz");
    }

    #[test]
    fn test_empty_ciphertext_is_noop() {
        let keypair = test_keypair();
        let out = decrypt_message("", &keypair.private_key, &CipherConfig::default(), &InitVector::from(0u64)).unwrap();
        assert_eq!(out, CipherOutput::Empty);

        let out = decrypt_message("  ", &keypair.private_key, &CipherConfig::default(), &InitVector::from(0u64)).unwrap();
        assert_eq!(out, CipherOutput::Text(String::new()));
    }

    #[test]
    fn test_invalid_token() {
        let keypair = test_keypair();
        let result = decrypt_message("12 abc", &keypair.private_key, &CipherConfig::default(), &InitVector::from(0u64));
        assert!(matches!(result, Err(CipherError::InvalidCiphertext(_))));
    }
}
