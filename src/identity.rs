//! Nostr identity: turning an `nsec` into the `npub` that acts as a username,
//! and signing the text note that gets broadcast for a new post.

use nostr_sdk::{
    nips::nip19::Nip19, Event, EventBuilder, FromBech32, Keys, PublicKey, SecretKey, ToBech32,
};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("cannot decode key")]
    Decode,

    #[error("key is not nsec")]
    NotNsec,

    #[error("cannot encode public key")]
    Encode,

    #[error("nsec does not match to logged in npub")]
    Mismatch,

    #[error("cannot sign nostr event: {0}")]
    Sign(String),
}

/// Keys decoded from a bech32 `nsec` along with the `npub` they derive.
#[derive(Debug, Clone)]
pub struct Identity {
    pub keys: Keys,
    pub npub: String,
}

impl Identity {
    pub fn from_nsec(nsec: &str) -> Result<Self, IdentityError> {
        let secret_key = match Nip19::from_bech32(nsec.trim()) {
            Ok(Nip19::Secret(secret_key)) => secret_key,
            Ok(_) => return Err(IdentityError::NotNsec),
            Err(_) => return Err(IdentityError::Decode),
        };
        Self::from_keys(Keys::new(secret_key))
    }

    pub fn from_keys(keys: Keys) -> Result<Self, IdentityError> {
        let npub = keys
            .public_key()
            .to_bech32()
            .map_err(|_| IdentityError::Encode)?;
        Ok(Self { keys, npub })
    }

    /// The whole of authentication: the key must belong to the session's npub.
    pub fn ensure_matches(&self, session_npub: Option<&str>) -> Result<(), IdentityError> {
        match session_npub {
            Some(npub) if npub == self.npub => Ok(()),
            _ => Err(IdentityError::Mismatch),
        }
    }

    /// A kind-1 text note over `content`, id and signature filled in.
    pub fn sign_text_note(&self, content: &str) -> Result<Event, IdentityError> {
        EventBuilder::text_note(content)
            .sign_with_keys(&self.keys)
            .map_err(|e| IdentityError::Sign(e.to_string()))
    }
}

/// Encodings of one keypair, as printed by the `nostrkey` tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEncodings {
    pub nsec: String,
    pub public_hex: String,
    pub npub: String,
}

impl KeyEncodings {
    pub fn from_keys(keys: &Keys) -> anyhow::Result<Self> {
        Ok(Self {
            nsec: keys.secret_key().to_bech32()?,
            public_hex: keys.public_key().to_hex(),
            npub: keys.public_key().to_bech32()?,
        })
    }

    pub fn from_secret_hex(secret_hex: &str) -> anyhow::Result<Self> {
        let secret_key = SecretKey::from_hex(secret_hex.trim())?;
        Self::from_keys(&Keys::new(secret_key))
    }
}

pub fn npub_from_public_hex(public_hex: &str) -> anyhow::Result<String> {
    Ok(PublicKey::from_hex(public_hex.trim())?.to_bech32()?)
}
