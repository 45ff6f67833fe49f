// RSA Key Codec
// Length-prefixed binary key layout, carried as base64 text
//
// Layout: [u32 len][exponent, big-endian][u32 len][modulus, big-endian]

use super::bigint::{from_bytes, to_bytes, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const LEN_SIZE: usize = 4;

/// Byte order of the 4-byte length prefixes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LengthOrder {
    Big,
    Little,
}

fn push_field(out: &mut Vec<u8>, field: &[u8]) {
    out.extend_from_slice(&(field.len() as u32).to_be_bytes());
    out.extend_from_slice(field);
}

fn encode_pair(exponent: &RsaBigInt, modulus: &RsaBigInt) -> Vec<u8> {
    let (exponent, modulus) = (to_bytes(exponent), to_bytes(modulus));
    let mut out = Vec::with_capacity(2 * LEN_SIZE + exponent.len() + modulus.len());
    push_field(&mut out, &exponent);
    push_field(&mut out, &modulus);
    out
}

/// Read one length-prefixed field starting at `*pos`
fn read_field<'a>(bytes: &'a [u8], pos: &mut usize, order: LengthOrder) -> RsaResult<&'a [u8]> {
    let prefix: [u8; LEN_SIZE] = bytes
        .get(*pos..*pos + LEN_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| {
            RsaError::MalformedKeyEncoding(format!("missing length field at offset {}", *pos))
        })?;
    let len = match order {
        LengthOrder::Big => u32::from_be_bytes(prefix),
        LengthOrder::Little => u32::from_le_bytes(prefix),
    } as usize;

    let start = *pos + LEN_SIZE;
    let remaining = bytes.len() - start;
    if len > remaining {
        return Err(RsaError::MalformedKeyEncoding(format!(
            "field at offset {} declares {} bytes but only {} remain",
            *pos, len, remaining
        )));
    }
    *pos = start + len;
    Ok(&bytes[start..start + len])
}

fn decode_pair(bytes: &[u8], order: LengthOrder) -> RsaResult<(RsaBigInt, RsaBigInt)> {
    let mut pos = 0;
    let exponent = from_bytes(read_field(bytes, &mut pos, order)?);
    let modulus = from_bytes(read_field(bytes, &mut pos, order)?);
    Ok((exponent, modulus))
}

/// Public key as `[len E][E][len N][N]`
pub fn public_key_to_bytes(key: &RsaPublicKey) -> Vec<u8> {
    encode_pair(&key.e, &key.n)
}

pub fn public_key_from_bytes(bytes: &[u8]) -> RsaResult<RsaPublicKey> {
    let (e, n) = decode_pair(bytes, LengthOrder::Big)?;
    Ok(RsaPublicKey::new(e, n))
}

/// Private key as `[len D][D][len N][N]`
pub fn private_key_to_bytes(key: &RsaPrivateKey) -> Vec<u8> {
    encode_pair(&key.d, &key.n)
}

/// Decode a private key, also accepting little-endian length prefixes as
/// written by hosts that stored them in native order.
pub fn private_key_from_bytes(bytes: &[u8]) -> RsaResult<RsaPrivateKey> {
    let (d, n) = match decode_pair(bytes, LengthOrder::Big) {
        Ok(pair) => pair,
        Err(err @ RsaError::MalformedKeyEncoding(_)) => {
            decode_pair(bytes, LengthOrder::Little).map_err(|_| err)?
        }
        Err(err) => return Err(err),
    };
    Ok(RsaPrivateKey::new(d, n))
}

pub fn encode_public_key(key: &RsaPublicKey) -> String {
    STANDARD.encode(public_key_to_bytes(key))
}

pub fn decode_public_key(text: &str) -> RsaResult<RsaPublicKey> {
    public_key_from_bytes(&STANDARD.decode(text.trim())?)
}

pub fn encode_private_key(key: &RsaPrivateKey) -> String {
    STANDARD.encode(private_key_to_bytes(key))
}

pub fn decode_private_key(text: &str) -> RsaResult<RsaPrivateKey> {
    private_key_from_bytes(&STANDARD.decode(text.trim())?)
}
