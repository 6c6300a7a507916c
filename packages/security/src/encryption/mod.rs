// ABOUTME: Salted key derivation and AES-256-CBC encryption keyed by a parent secret
// ABOUTME: Produces URL-safe base64 blobs laid out as salt || iv || ciphertext
//
// FORMAT:
//
// - A fresh 16-byte salt and 16-byte IV are drawn for every encryption
// - The cipher key is HKDF-SHA256(ikm = secret, salt, info = empty), 32 bytes
// - The plaintext is AES-256-CBC encrypted with PKCS#7 padding
// - The blob is base64url(salt || iv || ciphertext) with padding stripped
//
// The format carries no MAC. A wrong secret or a tampered blob is detected only
// through padding validation, so a small fraction of corruptions decrypt to garbage.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD},
        DecodePaddingMode,
    },
    Engine,
};
use ring::{
    hkdf,
    rand::{SecureRandom, SystemRandom},
};
use std::sync::Arc;

/// Salt size for key derivation
pub const SALT_SIZE: usize = 16;

/// IV size for AES-CBC
pub const IV_SIZE: usize = 16;

/// Derived key size (AES-256)
pub const KEY_SIZE: usize = 32;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

struct DerivedKeyLen;

impl hkdf::KeyType for DerivedKeyLen {
    fn len(&self) -> usize {
        KEY_SIZE
    }
}

/// URL-safe decoder that accepts blobs with or without trailing `=` padding
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("Failed to generate random data: {0}")]
    RandomGeneration(String),

    #[error("Malformed encrypted blob: {0}")]
    MalformedInput(String),

    #[error("Decryption failed")]
    DecryptionFailed,
}

/// Encrypts payloads under keys derived from a caller-supplied secret.
///
/// Holds no key material; every call derives its own key from the secret and
/// a per-call salt, so one instance can serve any number of secrets and threads.
#[derive(Debug, Clone)]
pub struct KeyDerivationCipher {
    rng: Arc<SystemRandom>,
}

impl KeyDerivationCipher {
    pub fn new() -> Self {
        Self {
            rng: Arc::new(SystemRandom::new()),
        }
    }

    /// Derive a 32-byte key from a secret and salt (HKDF-SHA256, empty info)
    pub fn derive_key(secret: &[u8], salt: &[u8; SALT_SIZE]) -> [u8; KEY_SIZE] {
        let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, salt).extract(secret);

        let mut key = [0u8; KEY_SIZE];
        prk.expand(&[], DerivedKeyLen)
            .and_then(|okm| okm.fill(&mut key))
            .expect("HKDF-SHA256 can expand to 32 bytes");
        key
    }

    /// Encrypt `plaintext` under a key derived from `secret`.
    /// Returns base64url (no padding): salt || iv || ciphertext
    pub fn encrypt(&self, secret: &[u8], plaintext: &[u8]) -> Result<String, CipherError> {
        let mut salt = [0u8; SALT_SIZE];
        self.rng.fill(&mut salt).map_err(|_| {
            CipherError::RandomGeneration("Failed to generate salt".to_string())
        })?;

        let mut iv = [0u8; IV_SIZE];
        self.rng
            .fill(&mut iv)
            .map_err(|_| CipherError::RandomGeneration("Failed to generate IV".to_string()))?;

        Ok(Self::encrypt_with(secret, plaintext, &salt, &iv))
    }

    /// Encrypt with a caller-chosen salt and IV (for deterministic testing)
    pub fn encrypt_with(
        secret: &[u8],
        plaintext: &[u8],
        salt: &[u8; SALT_SIZE],
        iv: &[u8; IV_SIZE],
    ) -> String {
        let key = Self::derive_key(secret, salt);
        let ciphertext =
            Aes256CbcEnc::new(&key.into(), &(*iv).into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut blob = Vec::with_capacity(SALT_SIZE + IV_SIZE + ciphertext.len());
        blob.extend_from_slice(salt);
        blob.extend_from_slice(iv);
        blob.extend_from_slice(&ciphertext);

        URL_SAFE_NO_PAD.encode(&blob)
    }

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt) with the same secret
    pub fn decrypt(&self, secret: &[u8], encoded: &str) -> Result<Vec<u8>, CipherError> {
        let blob = URL_SAFE_LENIENT
            .decode(encoded)
            .map_err(|e| CipherError::MalformedInput(format!("base64 decode: {}", e)))?;

        if blob.len() < SALT_SIZE + IV_SIZE {
            return Err(CipherError::MalformedInput(format!(
                "blob is {} bytes, need at least {}",
                blob.len(),
                SALT_SIZE + IV_SIZE
            )));
        }

        let (salt, rest) = blob.split_at(SALT_SIZE);
        let (iv, ciphertext) = rest.split_at(IV_SIZE);

        let mut salt_bytes = [0u8; SALT_SIZE];
        salt_bytes.copy_from_slice(salt);
        let mut iv_bytes = [0u8; IV_SIZE];
        iv_bytes.copy_from_slice(iv);

        let key = Self::derive_key(secret, &salt_bytes);

        // Wrong keys and broken padding both land here
        Aes256CbcDec::new(&key.into(), &iv_bytes.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CipherError::DecryptionFailed)
    }
}

impl Default for KeyDerivationCipher {
    fn default() -> Self {
        Self::new()
    }
}
