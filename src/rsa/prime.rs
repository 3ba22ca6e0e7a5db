// Probable Prime Generation
// Random odd candidates, a small-prime pre-filter and the Miller-Rabin test

use lazy_static::lazy_static;
use log::debug;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{thread_rng, Rng};

use super::bigint::{from_u64, mod_pow, random_range, RsaBigInt};
use super::search::SearchControl;
use crate::config::KeyGenConfig;
use crate::error::{CipherError, Result};

/// Number of small primes in the pre-filter table
pub const SMALL_PRIME_COUNT: usize = 500;

/// Miller-Rabin witness count; false-accept probability is at most (1/4)^20
pub const MILLER_RABIN_ROUNDS: u32 = 20;

lazy_static! {
    /// The first 500 primes, 2 through 3571.
    static ref SMALL_PRIMES: Vec<u32> = first_primes(SMALL_PRIME_COUNT);
}

pub fn small_primes() -> &'static [u32] {
    &SMALL_PRIMES
}

/// Trial division over numbers of the form 6k ± 1
fn is_small_prime(n: u32) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut d = 5u32;
    while d * d <= n {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

fn first_primes(count: usize) -> Vec<u32> {
    (2u32..).filter(|&n| is_small_prime(n)).take(count).collect()
}

/// How the small-prime pre-filter treats a candidate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SieveMode {
    /// Decide on the first table prime alone. Every odd candidate passes.
    #[default]
    FirstDivisorOnly,
    /// Reject when any table prime p with p*p <= candidate divides it.
    Full,
}

fn rejected_by(candidate: &RsaBigInt, p: u32) -> bool {
    (candidate % p).is_zero() && from_u64(u64::from(p) * u64::from(p)) <= *candidate
}

/// Low-level primality filter run before Miller-Rabin
pub fn passes_low_level_filter(candidate: &RsaBigInt, sieve: SieveMode) -> bool {
    let primes = small_primes();
    match sieve {
        SieveMode::FirstDivisorOnly => match primes.first() {
            Some(&p) => !rejected_by(candidate, p),
            None => true,
        },
        SieveMode::Full => primes.iter().all(|&p| !rejected_by(candidate, p)),
    }
}

/// Miller-Rabin primality test with `rounds` random bases drawn from [2, candidate)
pub fn is_probable_prime<R: Rng + ?Sized>(candidate: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    let two = from_u64(2);
    if *candidate < two {
        return false;
    }
    if *candidate == two || *candidate == from_u64(3) {
        return true;
    }
    if candidate.is_even() {
        return false;
    }

    // candidate - 1 = 2^s * d with d odd
    let n_minus_one = candidate - 1u8;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    (0..rounds).all(|_| {
        let base = random_range(&mut *rng, &two, candidate);
        !is_composite_witness(&base, &d, s, candidate, &n_minus_one)
    })
}

fn is_composite_witness(
    base: &RsaBigInt,
    d: &RsaBigInt,
    s: u64,
    candidate: &RsaBigInt,
    n_minus_one: &RsaBigInt,
) -> bool {
    let mut x = mod_pow(base, d, candidate);
    if x.is_one() {
        return false;
    }

    // x walks through base^(2^r * d) for r in [0, s)
    for _ in 0..s {
        if x == *n_minus_one {
            return false;
        }
        x = (&x * &x) % candidate;
    }

    true
}

/// Classifies and generates probable primes
#[derive(Clone, Copy, Debug)]
pub struct PrimalityOracle {
    rounds: u32,
    sieve: SieveMode,
}

impl Default for PrimalityOracle {
    fn default() -> Self {
        Self {
            rounds: MILLER_RABIN_ROUNDS,
            sieve: SieveMode::default(),
        }
    }
}

impl PrimalityOracle {
    pub fn new(rounds: u32, sieve: SieveMode) -> Self {
        Self { rounds, sieve }
    }

    pub fn from_config(config: &KeyGenConfig) -> Self {
        Self::new(config.miller_rabin_rounds, config.sieve)
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn sieve(&self) -> SieveMode {
        self.sieve
    }

    /// Random odd integer in [2^(bits-1) + 1, 2^bits - 1]
    pub fn random_candidate<R: Rng + ?Sized>(rng: &mut R, bits: u64) -> Result<RsaBigInt> {
        if bits < 3 {
            return Err(CipherError::InvalidBitLength(bits));
        }

        let low = (RsaBigInt::one() << (bits - 1)) + 1u8;
        let high = (RsaBigInt::one() << bits) - 1u8;

        let mut candidate = random_range(rng, &low, &high);
        if candidate.is_even() {
            candidate += 1u8;
        }
        Ok(candidate)
    }

    pub fn is_probable_prime<R: Rng + ?Sized>(&self, candidate: &RsaBigInt, rng: &mut R) -> bool {
        passes_low_level_filter(candidate, self.sieve) && is_probable_prime(candidate, self.rounds, rng)
    }

    /// Draw candidates until one passes the filter and Miller-Rabin.
    ///
    /// Runs until a prime is found unless `control` cancels it or sets a limit.
    pub fn generate_probable_prime_with<R: Rng + ?Sized>(
        &self,
        bits: u64,
        control: &SearchControl,
        rng: &mut R,
    ) -> Result<RsaBigInt> {
        let mut attempts = 0u64;
        loop {
            control.check(attempts)?;
            attempts += 1;

            let candidate = Self::random_candidate(rng, bits)?;
            if self.is_probable_prime(&candidate, rng) {
                debug!("found {}-bit probable prime after {} candidates", bits, attempts);
                return Ok(candidate);
            }
        }
    }

    pub fn generate_probable_prime(&self, bits: u64, control: &SearchControl) -> Result<RsaBigInt> {
        self.generate_probable_prime_with(bits, control, &mut thread_rng())
    }
}
