use jsonwebtoken::{DecodingKey, EncodingKey};
use std::collections::HashMap;

/// HS256 secrets for one kind of credential, addressed by `kid`.
///
/// Access and refresh credentials each get their own store so that a leaked
/// key of one kind cannot mint the other.
#[derive(Clone)]
pub struct JwtKeyStore {
    // active key used for signing
    active_kid: String,
    active_secret: Vec<u8>,
    // all accepted keys for verifying (kid -> secret)
    keys: HashMap<String, Vec<u8>>,
}

impl JwtKeyStore {
    /// Returns `None` when `active_kid` is not among `jwt_keys`.
    pub fn new(jwt_keys: &[(String, Vec<u8>)], active_kid: &str) -> Option<Self> {
        let keys: HashMap<String, Vec<u8>> = jwt_keys.iter().cloned().collect();
        let active_secret = keys.get(active_kid)?.clone();
        Some(Self {
            active_kid: active_kid.to_string(),
            active_secret,
            keys,
        })
    }

    pub fn encoding_key_and_kid(&self) -> (EncodingKey, &str) {
        (EncodingKey::from_secret(&self.active_secret), &self.active_kid)
    }

    pub fn decoding_key_for_kid(&self, kid: Option<&str>) -> Option<DecodingKey> {
        let k = kid.unwrap_or(&self.active_kid);
        self.keys.get(k).map(|s| DecodingKey::from_secret(s))
    }

    pub fn shares_secret_with(&self, other: &JwtKeyStore) -> bool {
        self.keys
            .values()
            .any(|mine| other.keys.values().any(|theirs| theirs == mine))
    }
}
