// Prime Search
// Concurrent random search for probable primes of a fixed byte length

use super::bigint::RsaBigInt;
use super::error::{RsaError, RsaResult};
use super::primality::{is_probably_prime, DEFAULT_WITNESSES};
use log::{debug, trace};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::thread;

/// Search settings; every call to [`PrimeSearcher::find`] gets its own
/// result slot and stop flag, so searchers never serialise on each other.
#[derive(Clone, Copy, Debug)]
pub struct PrimeSearcher {
    pub workers: usize,
    pub witnesses: i32,
}

impl Default for PrimeSearcher {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            witnesses: DEFAULT_WITNESSES,
        }
    }
}

impl PrimeSearcher {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_witnesses(mut self, witnesses: i32) -> Self {
        self.witnesses = witnesses;
        self
    }

    /// Find a probable prime occupying exactly `bits / 8` bytes.
    ///
    /// Fails with [`RsaError::InvalidKeySize`] before any work is spawned
    /// when `bits` is not a positive multiple of 8.
    pub fn find(&self, bits: i64) -> RsaResult<RsaBigInt> {
        let byte_len = prime_byte_len(bits)?;

        let winner: OnceLock<RsaBigInt> = OnceLock::new();
        let stop = AtomicBool::new(false);
        let tested = AtomicU64::new(0);

        thread::scope(|s| {
            for worker in 0..self.workers {
                let (winner, stop, tested) = (&winner, &stop, &tested);
                s.spawn(move || {
                    let mut bytes = vec![0u8; byte_len];
                    while !stop.load(Ordering::Acquire) {
                        let candidate = random_candidate(&mut bytes);
                        tested.fetch_add(1, Ordering::Relaxed);
                        if is_probably_prime(&candidate, self.witnesses) {
                            if winner.set(candidate).is_ok() {
                                trace!("prime search: worker {} won", worker);
                            }
                            stop.store(true, Ordering::Release);
                        }
                    }
                });
            }
        });

        debug!(
            "prime search: {} bits after {} candidates",
            bits,
            tested.load(Ordering::Relaxed)
        );

        // Workers only exit once the slot holds a value
        winner
            .into_inner()
            .ok_or_else(|| RsaError::KeyGeneration(format!("no {}-bit prime found", bits)))
    }
}

/// Find a probable prime of `bits` bits with the default searcher
pub fn find_probable_prime(bits: i64) -> RsaResult<RsaBigInt> {
    PrimeSearcher::default().find(bits)
}

/// Validate a prime bit length and turn it into a byte length
pub fn prime_byte_len(bits: i64) -> RsaResult<usize> {
    if bits <= 0 || bits % 8 != 0 {
        return Err(RsaError::InvalidKeySize(bits));
    }
    Ok((bits / 8) as usize)
}

/// Fill `bytes` from the OS CSPRNG and read an odd candidate with the top bit set
fn random_candidate(bytes: &mut [u8]) -> RsaBigInt {
    OsRng.fill_bytes(bytes);
    bytes[0] |= 0x80;
    if let Some(last) = bytes.last_mut() {
        *last |= 0x01;
    }
    RsaBigInt::from_bytes_be(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::byte_len;

    #[test]
    fn test_find_probable_prime() {
        for bits in [8i64, 64, 128] {
            let p = find_probable_prime(bits).unwrap();
            assert_eq!(byte_len(&p), (bits / 8) as usize);
            assert_eq!(p.bits(), bits as u64);
            assert!(is_probably_prime(&p, 20));
        }
    }

    #[test]
    fn test_single_worker() {
        let searcher = PrimeSearcher::default().with_workers(1).with_witnesses(5);
        let p = searcher.find(32).unwrap();
        assert_eq!(byte_len(&p), 4);
        assert!(is_probably_prime(&p, 20));
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(
            find_probable_prime(13),
            Err(RsaError::InvalidKeySize(13))
        ));
        assert!(matches!(
            find_probable_prime(-8),
            Err(RsaError::InvalidKeySize(-8))
        ));
        assert!(matches!(
            find_probable_prime(0),
            Err(RsaError::InvalidKeySize(0))
        ));
    }

    #[test]
    fn test_random_candidate_shape() {
        let mut bytes = [0u8; 4];
        for _ in 0..32 {
            let c = random_candidate(&mut bytes);
            assert_eq!(c.bits(), 32);
            assert!(c.bit(0));
        }
    }
}
