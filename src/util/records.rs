// JSON records exchanged with the key/message directory and stored on disk

use crate::rsa::{
    decode_private_key, decode_public_key, encode_private_key, encode_public_key, RsaPrivateKey,
    RsaPublicKey, RsaResult,
};
use serde::{Deserialize, Serialize};

/// Public key document; `email` stays empty until the key is registered
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyRecord {
    pub email: String,
    pub key: String,
}

/// Private key document listing the identities it may decode for
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKeyRecord {
    pub email: Vec<String>,
    pub key: String,
}

/// Ciphertext addressed to an identity, base64 encoded
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub email: String,
    pub content: String,
}

impl PublicKeyRecord {
    pub fn from_key(key: &RsaPublicKey) -> Self {
        Self {
            email: key.identity.clone().unwrap_or_default(),
            key: encode_public_key(key),
        }
    }

    pub fn public_key(&self) -> RsaResult<RsaPublicKey> {
        let mut key = decode_public_key(&self.key)?;
        key.identity = (!self.email.is_empty()).then(|| self.email.clone());
        Ok(key)
    }
}

impl PrivateKeyRecord {
    pub fn from_key(key: &RsaPrivateKey) -> Self {
        Self {
            email: key.identities.clone(),
            key: encode_private_key(key),
        }
    }

    pub fn private_key(&self) -> RsaResult<RsaPrivateKey> {
        let mut key = decode_private_key(&self.key)?;
        for email in &self.email {
            key.authorize(email);
        }
        Ok(key)
    }

    /// Add `email` unless already present
    pub fn authorize(&mut self, email: &str) -> bool {
        if self.email.iter().any(|e| e == email) {
            return false;
        }
        self.email.push(email.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    #[test]
    fn test_public_record_identity() {
        let mut key = RsaPublicKey::new(from_u64(17), from_u64(13));
        let record = PublicKeyRecord::from_key(&key);
        assert_eq!(record.email, "");
        assert_eq!(record.key, "AAAAAREAAAABDQ==");
        assert_eq!(record.public_key().unwrap().identity, None);

        key.identity = Some("alice@example.com".to_string());
        let record = PublicKeyRecord::from_key(&key);
        assert_eq!(record.public_key().unwrap(), key);
    }

    #[test]
    fn test_private_record_authorize() {
        let key = RsaPrivateKey::new(from_u64(7), from_u64(33));
        let mut record = PrivateKeyRecord::from_key(&key);
        assert!(record.authorize("alice@example.com"));
        assert!(!record.authorize("alice@example.com"));

        let decoded = record.private_key().unwrap();
        assert_eq!(decoded.identities, vec!["alice@example.com"]);
        assert_eq!(decoded.d, from_u64(7));
    }

    #[test]
    fn test_json_field_names() {
        let record = MessageRecord {
            email: "bob@example.com".to_string(),
            content: "AQI=".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["email"], "bob@example.com");
        assert_eq!(json["content"], "AQI=");

        let private: PrivateKeyRecord =
            serde_json::from_str(r#"{"email": ["a", "b"], "key": "xyz"}"#).unwrap();
        assert_eq!(private.email, vec!["a", "b"]);
    }
}
