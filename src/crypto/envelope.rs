// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AES-256-CBC envelope with a random IV prefix.

use std::fmt;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};
use serde::{de::DeserializeOwned, Serialize};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block / IV size in bytes.
pub const IV_LEN: usize = 16;

/// AES-256 key size in bytes.
pub const KEY_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("key must be exactly {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload too short: {0} bytes")]
    TooShort(usize),

    #[error("decryption failed (bad padding or wrong key)")]
    Decrypt,

    #[error("decrypted payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("payload JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Symmetric cipher for CRUD payloads.
#[derive(Clone)]
pub struct PayloadCipher {
    key: [u8; KEY_LEN],
}

impl fmt::Debug for PayloadCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadCipher").finish_non_exhaustive()
    }
}

impl PayloadCipher {
    /// Build a cipher from a passphrase whose UTF-8 bytes are the raw key.
    ///
    /// No key derivation is applied, so the passphrase must be exactly
    /// 32 bytes long.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, CipherError> {
        Self::from_key_bytes(passphrase.as_bytes())
    }

    pub fn from_key_bytes(bytes: &[u8]) -> Result<Self, CipherError> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CipherError::InvalidKeyLength(bytes.len()))?;
        Ok(Self { key })
    }

    /// Encrypt a UTF-8 plaintext under a freshly generated IV.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let mut combined = Vec::with_capacity(IV_LEN + ciphertext.len());
        combined.extend_from_slice(&iv);
        combined.extend_from_slice(&ciphertext);
        STANDARD.encode(combined)
    }

    /// Decrypt a base64 `iv || ciphertext` blob back to its UTF-8 plaintext.
    pub fn decrypt(&self, blob: &str) -> Result<String, CipherError> {
        let combined = STANDARD.decode(blob.trim())?;
        if combined.len() < IV_LEN {
            return Err(CipherError::TooShort(combined.len()));
        }

        let (iv, ciphertext) = combined.split_at(IV_LEN);
        if ciphertext.is_empty() || ciphertext.len() % IV_LEN != 0 {
            return Err(CipherError::Decrypt);
        }

        let mut iv_block = [0u8; IV_LEN];
        iv_block.copy_from_slice(iv);

        let plaintext = Aes256CbcDec::new(&self.key.into(), &iv_block.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CipherError::Decrypt)?;

        Ok(String::from_utf8(plaintext)?)
    }

    /// Serialize `value` to JSON and encrypt it.
    pub fn seal_json<T: Serialize>(&self, value: &T) -> Result<String, CipherError> {
        let json = serde_json::to_string(value)?;
        Ok(self.encrypt(&json))
    }

    /// Decrypt a blob and deserialize the JSON inside.
    pub fn open_json<T: DeserializeOwned>(&self, blob: &str) -> Result<T, CipherError> {
        let json = self.decrypt(blob)?;
        Ok(serde_json::from_str(&json)?)
    }
}
