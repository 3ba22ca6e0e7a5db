// RSA Big Integer Operations
// Wrapper around num-bigint for the arithmetic the key generator and the block cipher need

use num_bigint::{BigInt, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::Rng;

/// RSA Big Integer type alias
pub type RsaBigInt = num_bigint::BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Iterative Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd(a, b)
pub fn extended_gcd(a: &RsaBigInt, b: &RsaBigInt) -> (RsaBigInt, BigInt, BigInt) {
    let mut a = BigInt::from(a.clone());
    let mut b = BigInt::from(b.clone());

    let (mut prev_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut prev_y, mut y) = (BigInt::zero(), BigInt::one());

    while !b.is_zero() {
        let (q, r) = a.div_rem(&b);

        let next_x = &prev_x - &q * &x;
        prev_x = std::mem::replace(&mut x, next_x);

        let next_y = &prev_y - &q * &y;
        prev_y = std::mem::replace(&mut y, next_y);

        a = std::mem::replace(&mut b, r);
    }

    (a.magnitude().clone(), prev_x, prev_y)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    let (gcd, mut x, _) = extended_gcd(a, m);

    if !gcd.is_one() {
        return None;
    }

    // The Bezout coefficient lies in (-m, m); one correction is enough.
    if x.is_negative() {
        x += BigInt::from(m.clone());
    }

    x.to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Uniform random big integer in [low, high)
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, low: &RsaBigInt, high: &RsaBigInt) -> RsaBigInt {
    rng.gen_biguint_range(low, high)
}

/// Bitwise XOR of two big integers
pub fn xor(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a ^ b
}
