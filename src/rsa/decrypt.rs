// RSA Decryption Implementation
// Inverse of the textbook transform in encrypt.rs

use super::bigint::{from_bytes, mod_pow, to_bytes};
use super::error::RsaResult;
use super::keygen::RsaPrivateKey;

/// Decrypt ciphertext bytes using RSA private key
/// Returns the minimal big-endian bytes of c^d mod n, so leading zero bytes
/// of the original plaintext are not recovered.
pub fn decrypt_bytes(ciphertext: &[u8], private_key: &RsaPrivateKey) -> Vec<u8> {
    let c = from_bytes(ciphertext);
    let m = mod_pow(&c, &private_key.d, &private_key.n);
    to_bytes(&m)
}

/// Decrypt ciphertext to a string
pub fn decrypt_to_string(ciphertext: &[u8], private_key: &RsaPrivateKey) -> RsaResult<String> {
    let plaintext = decrypt_bytes(ciphertext, private_key);
    Ok(String::from_utf8(plaintext)?)
}
