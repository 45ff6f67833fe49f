// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod primality;
pub mod search;

pub use codec::{decode_private_key, decode_public_key, encode_private_key, encode_public_key};
pub use decrypt::{decrypt_bytes, decrypt_to_string};
pub use encrypt::{encrypt_bytes, encrypt_string};
pub use error::{RsaError, RsaResult};
pub use keygen::{
    generate_keypair, generate_keypair_with, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
    PUBLIC_EXPONENT,
};
pub use primality::{is_probably_prime, DEFAULT_WITNESSES};
pub use search::{find_probable_prime, PrimeSearcher};
