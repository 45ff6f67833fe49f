// Persistence helpers around the RSA core

pub mod file_ops;
pub mod key_store;
pub mod records;

pub use file_ops::{StoreError, StoreResult};
pub use key_store::KeyStore;
pub use records::{MessageRecord, PrivateKeyRecord, PublicKeyRecord};
