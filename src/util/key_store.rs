// Local key files: our own key pair plus public keys fetched for contacts

use super::file_ops::{read_json, validate_identity, write_json, StoreError, StoreResult};
use super::records::{PrivateKeyRecord, PublicKeyRecord};
use log::debug;
use std::path::{Path, PathBuf};

pub const PUBLIC_FILE: &str = "public.key";
pub const PRIVATE_FILE: &str = "private.key";

#[derive(Clone, Debug)]
pub struct KeyStore {
    dir: PathBuf,
}

impl KeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn public_path(&self) -> PathBuf {
        self.dir.join(PUBLIC_FILE)
    }

    pub fn private_path(&self) -> PathBuf {
        self.dir.join(PRIVATE_FILE)
    }

    pub fn contact_path(&self, email: &str) -> StoreResult<PathBuf> {
        validate_identity(email)?;
        Ok(self.dir.join(format!("{}.key", email)))
    }

    pub fn save_public(&self, record: &PublicKeyRecord) -> StoreResult<()> {
        debug!("writing {}", self.public_path().display());
        write_json(&self.public_path(), record)
    }

    pub fn load_public(&self) -> StoreResult<PublicKeyRecord> {
        load_existing(&self.public_path(), || StoreError::MissingKey(PUBLIC_FILE.to_string()))
    }

    pub fn save_private(&self, record: &PrivateKeyRecord) -> StoreResult<()> {
        debug!("writing {}", self.private_path().display());
        write_json(&self.private_path(), record)
    }

    pub fn load_private(&self) -> StoreResult<PrivateKeyRecord> {
        load_existing(&self.private_path(), || {
            StoreError::MissingKey(PRIVATE_FILE.to_string())
        })
    }

    pub fn save_contact(&self, email: &str, record: &PublicKeyRecord) -> StoreResult<()> {
        write_json(&self.contact_path(email)?, record)
    }

    pub fn load_contact(&self, email: &str) -> StoreResult<PublicKeyRecord> {
        load_existing(&self.contact_path(email)?, || {
            StoreError::MissingContact(email.to_string())
        })
    }
}

fn load_existing<T, F>(path: &Path, missing: F) -> StoreResult<T>
where
    T: serde::de::DeserializeOwned,
    F: FnOnce() -> StoreError,
{
    if !path.exists() {
        return Err(missing());
    }
    read_json(path)
}
