// Modes of Operation
// ECB/CBC selection and the CBC initialization vector

use std::fmt;
use std::str::FromStr;

use num_traits::One;
use rand::{thread_rng, Rng};

use super::bigint::{from_u64, random_range, RsaBigInt};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Every block encrypted on its own
    #[default]
    Ecb,
    /// Each block XOR-ed with the previous ciphertext block (or the IV) before encryption
    Cbc,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Ecb => "ECB",
            Mode::Cbc => "CBC",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode of operation: {:?}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ECB" => Ok(Mode::Ecb),
            "CBC" => Ok(Mode::Cbc),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// CBC seed value: a random integer 8 * block_size bits wide
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitVector(RsaBigInt);

impl InitVector {
    pub fn random(block_size: usize) -> Self {
        Self::random_with(block_size, &mut thread_rng())
    }

    /// Uniform in [2^(8*block_size - 1), 2^(8*block_size) - 1)
    pub fn random_with<R: Rng + ?Sized>(block_size: usize, rng: &mut R) -> Self {
        let bits = 8 * block_size.max(1) as u64;
        let low = RsaBigInt::one() << (bits - 1);
        let high = (RsaBigInt::one() << bits) - 1u8;
        InitVector(random_range(rng, &low, &high))
    }

    pub fn from_value(value: RsaBigInt) -> Self {
        InitVector(value)
    }

    pub fn value(&self) -> &RsaBigInt {
        &self.0
    }
}

impl From<u64> for InitVector {
    fn from(value: u64) -> Self {
        InitVector(from_u64(value))
    }
}
