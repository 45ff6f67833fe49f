// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use super::bigint::{from_u64, gcd, mod_inverse, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::search::{prime_byte_len, PrimeSearcher};
use log::{debug, info};
use num_traits::One;
use rand::rngs::OsRng;
use rand::Rng;
use std::{panic, thread};

/// Public exponent shared by every generated key
pub const PUBLIC_EXPONENT: u64 = 65537;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub e: RsaBigInt,  // Public exponent
    pub n: RsaBigInt,  // Modulus
    /// Identity the key is published under, once registered
    pub identity: Option<String>,
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub d: RsaBigInt,  // Private exponent
    pub n: RsaBigInt,  // Modulus (same as public)
    /// Identities this key may decode messages for, in registration order
    pub identities: Vec<String>,
}

/// Full key material of one generation run.
///
/// `p`, `q` and `r` never leave this struct; only the public and private
/// halves are handed to encoders and transports.
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub p: RsaBigInt,
    pub q: RsaBigInt,
    pub n: RsaBigInt,
    pub e: RsaBigInt,
    pub d: RsaBigInt,
    /// Totient (p-1)(q-1)
    pub r: RsaBigInt,
}

impl RsaPublicKey {
    pub fn new(e: RsaBigInt, n: RsaBigInt) -> Self {
        Self { e, n, identity: None }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt a message using this public key
    /// Returns ciphertext as bytes
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        super::encrypt::encrypt_bytes(plaintext, self)
    }
}

impl RsaPrivateKey {
    pub fn new(d: RsaBigInt, n: RsaBigInt) -> Self {
        Self {
            d,
            n,
            identities: Vec::new(),
        }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Authorise `identity`; returns false if it was already present
    pub fn authorize(&mut self, identity: &str) -> bool {
        if self.is_authorized(identity) {
            return false;
        }
        self.identities.push(identity.to_string());
        true
    }

    pub fn is_authorized(&self, identity: &str) -> bool {
        self.identities.iter().any(|i| i == identity)
    }

    /// Decrypt a ciphertext using this private key
    /// Returns plaintext as bytes
    pub fn decrypt(&self, ciphertext: &[u8]) -> Vec<u8> {
        super::decrypt::decrypt_bytes(ciphertext, self)
    }
}

impl RsaKeyPair {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey::new(self.e.clone(), self.n.clone())
    }

    pub fn private_key(&self) -> RsaPrivateKey {
        RsaPrivateKey::new(self.d.clone(), self.n.clone())
    }
}

/// Split `key_bits` into the bit sizes of p and q.
///
/// p is shortened and q lengthened by the same random whole number of bytes,
/// up to a tenth of the key size.
pub fn split_prime_sizes(key_bits: i64) -> RsaResult<(i64, i64)> {
    prime_byte_len(key_bits)?;
    let max_steps = key_bits / 10 / 8;
    let offset = OsRng.gen_range(0..=max_steps) * 8;
    Ok((key_bits / 2 - offset, key_bits / 2 + offset))
}

/// Generate RSA key pair with the default prime searcher
/// key_bits: Size of the modulus in bits, a positive multiple of 8
pub fn generate_keypair(key_bits: i64) -> RsaResult<RsaKeyPair> {
    generate_keypair_with(key_bits, &PrimeSearcher::default())
}

/// Generate RSA key pair, searching for p and q concurrently with `searcher`
pub fn generate_keypair_with(key_bits: i64, searcher: &PrimeSearcher) -> RsaResult<RsaKeyPair> {
    let e = from_u64(PUBLIC_EXPONENT);

    loop {
        let (p_bits, q_bits) = split_prime_sizes(key_bits)?;
        debug!("keygen: p {} bits, q {} bits", p_bits, q_bits);

        // Plain threads: the rayon pool stays free for the witness trials
        let (p, q) = thread::scope(|s| {
            let p = s.spawn(|| searcher.find(p_bits));
            let q = searcher.find(q_bits);
            (p.join().unwrap_or_else(|err| panic::resume_unwind(err)), q)
        });
        let (p, q) = match (p, q) {
            (Ok(p), Ok(q)) => (p, q),
            (Err(RsaError::InvalidKeySize(_)), _) | (_, Err(RsaError::InvalidKeySize(_))) => {
                return Err(RsaError::KeyGeneration(format!(
                    "number of bits for p ({}) and q ({}) must be divisible by 8",
                    p_bits, q_bits
                )));
            }
            (Err(err), _) | (_, Err(err)) => return Err(err),
        };

        if p == q {
            debug!("keygen: p == q, retrying");
            continue;
        }

        let n = &p * &q;
        let r = (&p - 1u8) * (&q - 1u8);

        // e is prime, so this only fails when e divides p-1 or q-1
        if !gcd(&e, &r).is_one() {
            debug!("keygen: e shares a factor with the totient, retrying");
            continue;
        }
        let d = mod_inverse(&e, &r).ok_or_else(|| {
            RsaError::KeyGeneration("failed to compute modular inverse".to_string())
        })?;

        info!("generated {}-bit RSA key pair", n.bits());
        return Ok(RsaKeyPair { p, q, n, e, d, r });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let keypair = generate_keypair(512).unwrap();

        // top bits of p and q are set, so n loses at most one bit
        let bits = keypair.bit_length();
        assert!(bits == 512 || bits == 511, "bits = {}", bits);
        assert_eq!(keypair.e, from_u64(65537));
        assert!(keypair.d < keypair.r);
    }

    #[test]
    fn test_key_properties() {
        let keypair = generate_keypair(512).unwrap();

        // Verify n = p * q
        assert_eq!(keypair.n, &keypair.p * &keypair.q);

        // Verify e * d ≡ 1 (mod (p-1)(q-1))
        let r = (&keypair.p - 1u8) * (&keypair.q - 1u8);
        assert_eq!(r, keypair.r);
        assert!(((&keypair.e * &keypair.d) % &r).is_one());
    }

    #[test]
    fn test_key_encrypt_decrypt() {
        let keypair = generate_keypair(512).unwrap();
        let message = b"Hello, RSA!";

        let ciphertext = keypair.public_key().encrypt(message);
        let decrypted = keypair.private_key().decrypt(&ciphertext);

        assert_eq!(message.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_split_prime_sizes() {
        for _ in 0..50 {
            let (p_bits, q_bits) = split_prime_sizes(1024).unwrap();
            assert_eq!(p_bits + q_bits, 1024);
            assert_eq!(p_bits % 8, 0);
            assert!(q_bits - p_bits <= 2 * 96);
            assert!(p_bits <= q_bits);
        }
    }

    #[test]
    fn test_invalid_key_sizes() {
        assert!(matches!(
            generate_keypair(-512),
            Err(RsaError::InvalidKeySize(-512))
        ));
        assert!(matches!(
            generate_keypair(1001),
            Err(RsaError::InvalidKeySize(1001))
        ));
    }

    #[test]
    fn test_odd_half_size_rejected() {
        // 520 / 2 = 260 bits, not a whole number of bytes
        assert!(matches!(
            generate_keypair(520),
            Err(RsaError::KeyGeneration(_))
        ));
    }

    #[test]
    fn test_private_key_identities() {
        let mut key = RsaPrivateKey::new(from_u64(7), from_u64(33));
        assert!(key.authorize("alice@example.com"));
        assert!(key.authorize("bob@example.com"));
        assert!(!key.authorize("alice@example.com"));
        assert_eq!(key.identities, vec!["alice@example.com", "bob@example.com"]);
        assert!(key.is_authorized("bob@example.com"));
        assert!(!key.is_authorized("carol@example.com"));
    }
}
