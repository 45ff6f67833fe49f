// Key/message directory
// Public keys and the latest message are published per identity

use crate::util::file_ops::{read_json, validate_identity, write_json, StoreError, StoreResult};
use crate::util::records::{MessageRecord, PublicKeyRecord};
use log::debug;
use std::path::PathBuf;

pub trait Directory {
    /// Publish `record` for `email`, replacing any existing key
    fn put_key(&self, email: &str, record: &PublicKeyRecord) -> StoreResult<()>;

    fn get_key(&self, email: &str) -> StoreResult<PublicKeyRecord>;

    /// Leave `record` in the mailbox of `email`, replacing the previous message
    fn put_message(&self, email: &str, record: &MessageRecord) -> StoreResult<()>;

    fn get_message(&self, email: &str) -> StoreResult<MessageRecord>;
}

/// Directory kept in a local folder: `keys/<email>.json`, `messages/<email>.json`
#[derive(Clone, Debug)]
pub struct LocalDirectory {
    root: PathBuf,
}

impl LocalDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry(&self, kind: &str, email: &str) -> StoreResult<PathBuf> {
        validate_identity(email)?;
        Ok(self.root.join(kind).join(format!("{}.json", email)))
    }

    fn get<T: serde::de::DeserializeOwned>(
        &self,
        kind: &'static str,
        email: &str,
    ) -> StoreResult<T> {
        let path = self.entry(kind, email)?;
        if !path.exists() {
            return Err(StoreError::NotFound {
                kind,
                identity: email.to_string(),
            });
        }
        read_json(&path)
    }
}

impl Directory for LocalDirectory {
    fn put_key(&self, email: &str, record: &PublicKeyRecord) -> StoreResult<()> {
        debug!("directory: put key for {}", email);
        write_json(&self.entry("keys", email)?, record)
    }

    fn get_key(&self, email: &str) -> StoreResult<PublicKeyRecord> {
        self.get("keys", email)
    }

    fn put_message(&self, email: &str, record: &MessageRecord) -> StoreResult<()> {
        debug!("directory: put message for {}", email);
        write_json(&self.entry("messages", email)?, record)
    }

    fn get_message(&self, email: &str) -> StoreResult<MessageRecord> {
        self.get("messages", email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let dir = tempfile::tempdir().unwrap();
        let directory = LocalDirectory::new(dir.path());

        assert!(matches!(
            directory.get_key("alice@example.com"),
            Err(StoreError::NotFound { kind: "keys", .. })
        ));

        let first = PublicKeyRecord {
            email: "alice@example.com".to_string(),
            key: "first".to_string(),
        };
        let second = PublicKeyRecord {
            key: "second".to_string(),
            ..first.clone()
        };
        directory.put_key("alice@example.com", &first).unwrap();
        directory.put_key("alice@example.com", &second).unwrap();
        assert_eq!(directory.get_key("alice@example.com").unwrap(), second);

        let message = MessageRecord {
            email: "alice@example.com".to_string(),
            content: "AQI=".to_string(),
        };
        directory.put_message("alice@example.com", &message).unwrap();
        assert_eq!(directory.get_message("alice@example.com").unwrap(), message);
        assert!(matches!(
            directory.get_message("bob@example.com"),
            Err(StoreError::NotFound { kind: "messages", .. })
        ));
    }

    #[test]
    fn test_identity_stays_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let directory = LocalDirectory::new(dir.path().join("directory"));
        let record = PublicKeyRecord::default();

        assert!(matches!(
            directory.put_key("../../escaped", &record),
            Err(StoreError::InvalidIdentity(_))
        ));
        assert!(matches!(
            directory.get_message("..\\mail"),
            Err(StoreError::InvalidIdentity(_))
        ));
        assert!(!dir.path().join("escaped.json").exists());
    }
}
