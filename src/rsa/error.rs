// RSA Errors
// Error kinds reported by key generation, key encoding and the transform

use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RsaError {
    /// Bit length negative, zero or not a multiple of 8
    #[error("invalid key size {0}: bit length must be a positive multiple of 8")]
    InvalidKeySize(i64),

    #[error("malformed key encoding: {0}")]
    MalformedKeyEncoding(String),

    #[error("invalid base64 key text: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("decrypted message is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub type RsaResult<T> = Result<T, RsaError>;
