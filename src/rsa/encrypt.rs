// RSA Encryption Implementation
// Textbook RSA: the whole plaintext is one integer block, no padding

use super::bigint::{from_bytes, mod_pow, to_bytes};
use super::keygen::RsaPublicKey;
use log::warn;

/// Encrypt bytes using RSA public key
/// Returns the minimal big-endian bytes of m^e mod n.
///
/// The plaintext read as a big-endian integer must be smaller than n;
/// larger values wrap around and will not decrypt to the original.
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> Vec<u8> {
    let m = from_bytes(plaintext);
    if m >= public_key.n {
        warn!(
            "plaintext of {} bytes does not fit below a {}-bit modulus",
            plaintext.len(),
            public_key.bit_length()
        );
    }

    // Compute c = m^e mod n
    let c = mod_pow(&m, &public_key.e, &public_key.n);
    to_bytes(&c)
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> Vec<u8> {
    encrypt_bytes(plaintext.as_bytes(), public_key)
}
