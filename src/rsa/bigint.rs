// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to its minimal big-endian bytes.
/// Zero encodes as a single `0x00` byte.
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be()
}

/// Number of bytes in the minimal big-endian encoding of `n`
pub fn byte_len(n: &RsaBigInt) -> usize {
    ((n.bits() + 7) / 8).max(1) as usize
}

/// Modular exponentiation: base^exp mod modulus
/// A zero modulus (from a corrupt key) yields zero instead of panicking
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_zero() || modulus.is_one() {
        return RsaBigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Compute modular inverse: a^(-1) mod m, normalised into [0, m)
///
/// Iterative extended Euclid: the Bézout coefficient of `a` is carried along
/// until the remainder reaches zero. Returns None if gcd(a, m) != 1.
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let modulus = BigInt::from_biguint(Sign::Plus, m.clone());
    let (mut old_r, mut r) = (BigInt::from_biguint(Sign::Plus, a.clone()), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.abs().is_one() {
        return None;
    }

    let inv = old_s.mod_floor(&modulus);
    inv.to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}
