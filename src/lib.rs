//! RSA key generation from concurrently searched probable primes, a compact
//! length-prefixed key encoding, and textbook RSA messaging on top of them.

pub mod app;
pub mod rsa;
pub mod util;
