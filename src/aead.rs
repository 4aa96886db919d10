//! Authenticated encryption of envelope payloads.
//!
//! Payloads are sealed with AES-256-GCM under a [`SymmetricKey`]. The output is laid out as
//! `nonce || ciphertext || tag`, with a fresh random 96-bit nonce for every call.
use super::{
    element::SymmetricKey,
    error::{Error, Result},
};

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use log::debug;
use rand::{CryptoRng, RngCore};

/// Size of the nonce that is prepended to every ciphertext.
pub const NONCE_SIZE: usize = 12;

/// Size of the authentication tag that is appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

fn cipher(key: &SymmetricKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| Error::CipherInitialization)
}

/// Encrypts `payload` under `key`.
///
/// Fails with [`Error::PayloadTooLarge`] if `payload` is longer than GCM allows (about 64 GiB).
pub fn encrypt<R: RngCore + CryptoRng>(
    mut rng: R,
    key: &SymmetricKey,
    payload: &[u8],
) -> Result<Vec<u8>> {
    let cipher = cipher(key)?;
    let mut nonce = [0u8; NONCE_SIZE];
    rng.try_fill_bytes(&mut nonce)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), payload)
        .map_err(|_| Error::PayloadTooLarge)?;
    Ok([nonce.as_slice(), &ciphertext].concat())
}

/// Decrypts data previously returned by [`encrypt`].
///
/// Fails with [`Error::IntegrityFailure`] for a wrong key, tampered data or truncated input.
pub fn decrypt(key: &SymmetricKey, data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < NONCE_SIZE + TAG_SIZE {
        debug!("ciphertext of {} bytes is too short", data.len());
        return Err(Error::IntegrityFailure);
    }
    let (nonce, ciphertext) = data.split_at(NONCE_SIZE);
    cipher(key)?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::IntegrityFailure)
}
