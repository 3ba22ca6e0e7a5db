// RSA Key Generation
// Two probable primes, a randomly chosen public exponent and its inverse modulo the totient

use std::fmt;

use log::{debug, info};
use num_traits::One;
use rand::{thread_rng, Rng};

use super::bigint::{from_u64, gcd, mod_inverse, random_range, RsaBigInt};
use super::prime::PrimalityOracle;
use super::search::SearchControl;
use crate::config::KeyGenConfig;
use crate::error::{CipherError, Result};

/// Which half of a key pair a record holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyRole {
    Public,
    Private,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Public => f.write_str("public"),
            KeyRole::Private => f.write_str("private"),
        }
    }
}

/// One half of an RSA key pair: the shared modulus and either e or d
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKey {
    pub modulus: RsaBigInt,
    pub exponent: RsaBigInt,
    pub role: KeyRole,
}

impl RsaKey {
    pub fn new(modulus: RsaBigInt, exponent: RsaBigInt, role: KeyRole) -> Self {
        Self {
            modulus,
            exponent,
            role,
        }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.modulus.bits()
    }
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public_key: RsaKey,
    pub private_key: RsaKey,
}

impl KeyPair {
    /// Get the bit length of the key
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }
}

/// Totient of n = p * q
pub fn totient(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    (p - 1u8) * (q - 1u8)
}

/// Rejection-sample e uniformly from [2, phi) until gcd(e, phi) = 1
pub fn choose_public_exponent_with<R: Rng + ?Sized>(
    phi: &RsaBigInt,
    control: &SearchControl,
    rng: &mut R,
) -> Result<RsaBigInt> {
    let two = from_u64(2);
    let mut attempts = 0u64;
    loop {
        control.check(attempts)?;
        attempts += 1;

        let e = random_range(rng, &two, phi);
        if gcd(&e, phi).is_one() {
            debug!("public exponent accepted after {} draws", attempts);
            return Ok(e);
        }
    }
}

pub fn choose_public_exponent(phi: &RsaBigInt, control: &SearchControl) -> Result<RsaBigInt> {
    choose_public_exponent_with(phi, control, &mut thread_rng())
}

/// Build a key pair from known primes and a public exponent
pub fn derive_keypair(p: &RsaBigInt, q: &RsaBigInt, e: &RsaBigInt) -> Result<KeyPair> {
    let n = p * q;
    let phi = totient(p, q);

    let d = mod_inverse(e, &phi).ok_or(CipherError::NoModularInverse)?;

    Ok(KeyPair {
        public_key: RsaKey::new(n.clone(), e.clone(), KeyRole::Public),
        private_key: RsaKey::new(n, d, KeyRole::Private),
    })
}

/// Generate an RSA key pair whose primes are `config.prime_bits` long each
pub fn generate_keypair_with<R: Rng + ?Sized>(
    config: &KeyGenConfig,
    control: &SearchControl,
    rng: &mut R,
) -> Result<KeyPair> {
    info!("Generating a new pair of keys...");

    let oracle = PrimalityOracle::from_config(config);
    let p = oracle.generate_probable_prime_with(config.prime_bits, control, rng)?;
    let q = oracle.generate_probable_prime_with(config.prime_bits, control, rng)?;

    let phi = totient(&p, &q);
    let e = choose_public_exponent_with(&phi, control, rng)?;
    let keypair = derive_keypair(&p, &q, &e)?;

    info!(
        "Generation of new pair of keys finished ({}-bit modulus).",
        keypair.bit_length()
    );
    Ok(keypair)
}

pub fn generate_keypair(config: &KeyGenConfig, control: &SearchControl) -> Result<KeyPair> {
    generate_keypair_with(config, control, &mut thread_rng())
}
