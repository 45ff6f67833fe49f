// Miller-Rabin Primality Test
// Witness trials fan out over the rayon pool

use super::bigint::{byte_len, mod_pow, RsaBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::{thread_rng, RngCore};
use rayon::prelude::*;

/// Witness count used when the caller asks for zero or fewer
pub const DEFAULT_WITNESSES: i32 = 10;

/// Miller-Rabin primality test
///
/// Returns true if `value` is probably prime. Each witness that fails to
/// disprove primality lowers the false-positive probability by a factor of
/// four, so a composite slips through with probability at most 4^(-witnesses).
/// A non-positive `witnesses` falls back to [`DEFAULT_WITNESSES`].
pub fn is_probably_prime(value: &RsaBigInt, witnesses: i32) -> bool {
    let two = RsaBigInt::from(2u8);
    if value <= &RsaBigInt::one() {
        return false;
    }
    // No witness fits in [2, value - 2) below 5
    if value <= &RsaBigInt::from(3u8) {
        return true;
    }
    if value.is_even() {
        return false;
    }

    let witnesses = if witnesses <= 0 {
        DEFAULT_WITNESSES
    } else {
        witnesses
    };

    // Write value-1 as d * 2^s with d odd
    let value_minus_one = value - 1u8;
    let mut d = value_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let size = byte_len(value);
    let upper = value - &two;

    // `all` stops handing out trials once one of them proves compositeness
    (0..witnesses).into_par_iter().all(|_| {
        let a = random_witness(size, &two, &upper);
        witness_passes(&a, &d, s, value, &value_minus_one)
    })
}

/// Draw `size` random bytes until they read as an integer in [low, high)
fn random_witness(size: usize, low: &RsaBigInt, high: &RsaBigInt) -> RsaBigInt {
    let mut rng = thread_rng();
    let mut bytes = vec![0u8; size];
    loop {
        rng.fill_bytes(&mut bytes);
        let a = RsaBigInt::from_bytes_be(&bytes);
        if &a >= low && &a < high {
            return a;
        }
    }
}

/// One Miller-Rabin trial; false means `value` is definitely composite
fn witness_passes(
    a: &RsaBigInt,
    d: &RsaBigInt,
    s: u32,
    value: &RsaBigInt,
    value_minus_one: &RsaBigInt,
) -> bool {
    let mut x = mod_pow(a, d, value);
    if x.is_one() || &x == value_minus_one {
        return true;
    }

    let two = RsaBigInt::from(2u8);
    for _ in 1..s {
        x = mod_pow(&x, &two, value);
        if &x == value_minus_one {
            return true;
        }
        if x.is_one() {
            return false;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use rand::Rng;

    fn sieve(limit: usize) -> Vec<bool> {
        let mut is_prime = vec![true; limit];
        is_prime[0] = false;
        is_prime[1] = false;
        let mut i = 2;
        while i * i < limit {
            if is_prime[i] {
                let mut j = i * i;
                while j < limit {
                    is_prime[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        is_prime
    }

    #[test]
    fn test_small_values() {
        assert!(!is_probably_prime(&from_u64(0), 10));
        assert!(!is_probably_prime(&from_u64(1), 10));
        assert!(is_probably_prime(&from_u64(2), 10));
        assert!(is_probably_prime(&from_u64(3), 10));
        assert!(!is_probably_prime(&from_u64(4), 10));
        assert!(is_probably_prime(&from_u64(5), 10));
        assert!(!is_probably_prime(&from_u64(9), 10));
    }

    #[test]
    fn test_agrees_with_sieve() {
        let table = sieve(3000);
        for (n, &prime) in table.iter().enumerate() {
            // Composites are caught by a single witness unless it is a liar,
            // so use enough witnesses to make a flake impossible in practice
            let witnesses = if prime { 1 } else { 40 };
            assert_eq!(
                is_probably_prime(&from_u64(n as u64), witnesses),
                prime,
                "n = {}",
                n
            );
        }
    }

    #[test]
    fn test_known_large_values() {
        // 2^61 - 1 and 2^89 - 1 are Mersenne primes
        let m61 = (RsaBigInt::one() << 61u32) - 1u8;
        let m89 = (RsaBigInt::one() << 89u32) - 1u8;
        assert!(is_probably_prime(&m61, 10));
        assert!(is_probably_prime(&m89, 10));
        assert!(!is_probably_prime(&(&m61 * &m89), 10));

        // Carmichael numbers fool Fermat but not Miller-Rabin
        for c in [561u64, 1105, 1729, 2465, 2821, 6601, 8911] {
            assert!(!is_probably_prime(&from_u64(c), 20), "carmichael {}", c);
        }
    }

    #[test]
    fn test_non_positive_witnesses_use_default() {
        assert!(is_probably_prime(&from_u64(7919), 0));
        assert!(is_probably_prime(&from_u64(7919), -3));
        assert!(!is_probably_prime(&from_u64(7917), 0));
    }

    #[test]
    fn test_false_positive_rate() {
        // Odd composites p*q with both factors above the witness byte range
        let primes = [1009u64, 1013, 1019, 1021, 1031, 1033, 1039, 1049];
        let mut rng = thread_rng();
        let trials = 2000;
        let mut false_positives = 0;
        for _ in 0..trials {
            let p = primes[rng.gen_range(0..primes.len())];
            let q = primes[rng.gen_range(0..primes.len())];
            if is_probably_prime(&from_u64(p * q), 2) {
                false_positives += 1;
            }
        }
        // bound is 4^-2 = 1/16 of the trials
        assert!(false_positives * 16 <= trials, "{} false positives", false_positives);
    }
}
