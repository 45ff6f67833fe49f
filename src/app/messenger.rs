// Messenger operations
// Key generation, key exchange and textbook RSA messages through a Directory

use super::config::Config;
use super::directory::Directory;
use crate::rsa::{decrypt_to_string, encrypt_string, generate_keypair_with, RsaError};
use crate::util::file_ops::validate_identity;
use crate::util::{KeyStore, MessageRecord, PrivateKeyRecord, PublicKeyRecord, StoreError, StoreResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};

pub struct Messenger<D: Directory> {
    config: Config,
    store: KeyStore,
    directory: D,
}

impl<D: Directory> Messenger<D> {
    pub fn new(config: Config, directory: D) -> Self {
        let store = KeyStore::new(config.key_dir.clone());
        Self {
            config,
            store,
            directory,
        }
    }

    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    /// Generate a key pair of `key_bits` bits and store both halves locally.
    /// The new keys are not associated with any identity yet.
    pub fn key_gen(&self, key_bits: i64) -> StoreResult<()> {
        let keypair = generate_keypair_with(key_bits, &self.config.searcher())?;
        let modulus = keypair.n.to_bytes_be();
        debug!("modulus starts {}", hex::encode(&modulus[..modulus.len().min(8)]));

        let private = keypair.private_key();
        self.store.save_private(&PrivateKeyRecord::from_key(&private))?;
        self.store
            .save_public(&PublicKeyRecord::from_key(&keypair.public_key()))?;
        info!(
            "{}-bit key pair written to {}",
            private.bit_length(),
            self.store.dir().display()
        );
        Ok(())
    }

    /// Publish the local public key under `email` and authorise `email`
    /// on the local private key.
    pub fn send_key(&self, email: &str) -> StoreResult<()> {
        validate_identity(email)?;
        let mut public = self.store.load_public()?;
        public.email = email.to_string();
        self.store.save_public(&public)?;

        self.directory.put_key(email, &public)?;
        info!("key saved for {}", email);

        let mut private = self.store.load_private()?;
        if private.authorize(email) {
            self.store.save_private(&private)?;
        }
        Ok(())
    }

    /// Fetch the public key of `email` and keep it as a contact key
    pub fn get_key(&self, email: &str) -> StoreResult<()> {
        let record = self.directory.get_key(email)?;
        // reject undecodable keys before they land on disk
        record.public_key()?;
        self.store.save_contact(email, &record)?;
        info!("key for {} stored", email);
        Ok(())
    }

    /// Encrypt `plaintext` with the contact key of `email` and post it
    pub fn send_msg(&self, email: &str, plaintext: &str) -> StoreResult<()> {
        let key = self.store.load_contact(email)?.public_key()?;
        let ciphertext = encrypt_string(plaintext, &key);

        let message = MessageRecord {
            email: email.to_string(),
            content: STANDARD.encode(ciphertext),
        };
        self.directory.put_message(email, &message)?;
        info!("message written for {}", email);
        Ok(())
    }

    /// Fetch and decrypt the message waiting for `email`.
    /// Only identities registered with [`Messenger::send_key`] can be read.
    pub fn get_msg(&self, email: &str) -> StoreResult<String> {
        validate_identity(email)?;
        let key = self.store.load_private()?.private_key()?;
        if !key.is_authorized(email) {
            return Err(StoreError::NotAuthorized(email.to_string()));
        }

        let message = self.directory.get_message(email)?;
        let ciphertext = STANDARD
            .decode(message.content.trim())
            .map_err(RsaError::from)?;
        Ok(decrypt_to_string(&ciphertext, &key)?)
    }
}
