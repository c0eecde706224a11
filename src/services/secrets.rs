// SPDX-License-Identifier: MIT

//! AES-256-GCM codec for Tecopos tokens stored at rest.
//!
//! Each token is encrypted with a fresh random nonce; the nonce is prepended
//! to the ciphertext and the whole buffer is base64 encoded. GCM is
//! authenticated, so tampered or foreign ciphertext fails decryption instead
//! of producing garbage.

use crate::error::AppError;
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Size of the encryption key in bytes (256 bits)
const KEY_SIZE: usize = 32;

/// Size of the nonce in bytes (96 bits, standard for GCM)
const NONCE_SIZE: usize = 12;

/// Symmetric codec holding the process-wide token key.
///
/// Constructed once at startup and injected through `AppState`; tests build
/// one with a fixed key instead of reaching for globals.
#[derive(Clone)]
pub struct SecretCodec {
    cipher: Aes256Gcm,
}

impl SecretCodec {
    /// Build the codec from a base64-encoded 32-byte key. When no key is
    /// configured a random one is generated and held in memory only, which
    /// makes previously stored tokens undecryptable after a restart —
    /// operators are expected to set `TOKENS_SECRET_KEY` in real
    /// deployments.
    pub fn new(key_base64: Option<&str>) -> Result<Self, AppError> {
        let key_bytes = match key_base64 {
            Some(encoded) => {
                let bytes = BASE64.decode(encoded).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Invalid base64 token key: {}", e))
                })?;
                if bytes.len() != KEY_SIZE {
                    return Err(AppError::Internal(anyhow::anyhow!(
                        "Token key must be {} bytes, got {}",
                        KEY_SIZE,
                        bytes.len()
                    )));
                }
                bytes
            }
            None => {
                tracing::warn!(
                    "TOKENS_SECRET_KEY not set; generated an ephemeral key — stored \
                     credentials will not survive a restart"
                );
                Aes256Gcm::generate_key(OsRng).to_vec()
            }
        };

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create cipher: {}", e)))?;

        Ok(Self { cipher })
    }

    /// Encrypt a token. Returns base64(nonce || ciphertext).
    pub fn encrypt(&self, plaintext: &str) -> Result<String, AppError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Encryption failed: {}", e)))?;

        let mut buffer = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        buffer.extend_from_slice(&nonce);
        buffer.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(buffer))
    }

    /// Decrypt base64(nonce || ciphertext) produced by [`encrypt`].
    ///
    /// Every failure mode (bad base64, truncated buffer, auth-tag mismatch,
    /// non-UTF-8 plaintext) collapses into `AppError::Decryption`; callers
    /// treat it as fatal for the operation in progress.
    ///
    /// [`encrypt`]: SecretCodec::encrypt
    pub fn decrypt(&self, encoded: &str) -> Result<String, AppError> {
        let buffer = BASE64.decode(encoded).map_err(|_| AppError::Decryption)?;

        if buffer.len() <= NONCE_SIZE {
            return Err(AppError::Decryption);
        }
        let (nonce, ciphertext) = buffer.split_at(NONCE_SIZE);

        let plaintext = self
            .cipher
            .decrypt(nonce.into(), ciphertext)
            .map_err(|_| AppError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| AppError::Decryption)
    }
}
