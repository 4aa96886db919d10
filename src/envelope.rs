//! The hybrid envelope: a scheme encapsulation paired with an AES-256-GCM ciphertext.
//!
//! [`seal`] and [`open`] work for any [`SchemeKem`]. The mode-specific wrappers in
//! [`kem`][super::kem] are built on top of them.
use super::{
    aead,
    element::{derive_key, GroupElement},
    error::{Error, Result},
    scheme::SchemeKem,
};

use log::{debug, warn};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// An encapsulation together with the payload it protects.
///
/// Both halves are useless without each other. Envelopes are safe to publish.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Envelope<E> {
    encapsulation: E,
    ciphertext: Vec<u8>,
}

impl<E> Envelope<E> {
    pub fn encapsulation(&self) -> &E {
        &self.encapsulation
    }

    /// The AES-GCM part, laid out as `nonce || ciphertext || tag`.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Splits the envelope into its encapsulation and ciphertext.
    pub fn into_parts(self) -> (E, Vec<u8>) {
        (self.encapsulation, self.ciphertext)
    }

    /// Reassembles an envelope from parts that were transmitted separately.
    pub fn from_parts(encapsulation: E, ciphertext: Vec<u8>) -> Self {
        Self {
            encapsulation,
            ciphertext,
        }
    }
}

impl<E: Serialize> Envelope<E> {
    /// Encodes the envelope for storage or transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|_| Error::MalformedEnvelope)
    }
}

impl<E: for<'de> Deserialize<'de>> Envelope<E> {
    /// Decodes an envelope previously encoded with [`Envelope::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|_| Error::MalformedEnvelope)
    }
}

/// Encrypts `payload` for `policy`.
///
/// A fresh group element is sampled and encapsulated, then hashed into the AES key. Neither the
/// element nor the key is reused.
///
/// Parameters:
///
/// * `scheme` - The scheme to encapsulate with.
/// * `rng` - The randomness to use.
/// * `public_params` - The public parameters of the scheme.
/// * `policy` - The identity or attributes to encrypt for.
/// * `payload` - The payload to encrypt.
pub fn seal<S: SchemeKem, R: RngCore + CryptoRng>(
    scheme: &S,
    mut rng: R,
    public_params: &S::PublicParams,
    policy: &S::Policy,
    payload: &[u8],
) -> Result<Envelope<S::Encapsulation>> {
    let element = GroupElement::sample(&mut rng)?;
    let encapsulation = scheme.encapsulate(&mut rng, public_params, policy, element.inner())?;
    let key = derive_key(&element);
    let ciphertext = aead::encrypt(&mut rng, &key, payload)?;
    debug!(
        "sealed {} payload bytes into {} ciphertext bytes",
        payload.len(),
        ciphertext.len()
    );
    Ok(Envelope {
        encapsulation,
        ciphertext,
    })
}

/// Decrypts an envelope.
///
/// A key that does not match the envelope fails with [`Error::AccessDenied`] if the scheme
/// notices, and with [`Error::IntegrityFailure`] otherwise. Use [`Error::redact`] before showing
/// either to an untrusted party.
///
/// Parameters:
///
/// * `scheme` - The scheme the envelope was sealed with.
/// * `public_params` - The public parameters of the scheme.
/// * `key` - The secret key of the recipient.
/// * `context` - Additional input for decapsulation, see [`SchemeKem::Context`].
/// * `envelope` - The envelope to open.
pub fn open<S: SchemeKem>(
    scheme: &S,
    public_params: &S::PublicParams,
    key: &S::SecretKey,
    context: &S::Context,
    envelope: &Envelope<S::Encapsulation>,
) -> Result<Vec<u8>> {
    let element = scheme
        .decapsulate(public_params, key, context, &envelope.encapsulation)
        .map_err(|error| {
            warn!("decapsulation failed: {error}");
            error
        })?;
    let key = derive_key(&GroupElement::from(element));
    let payload = aead::decrypt(&key, &envelope.ciphertext).map_err(|error| {
        warn!("payload decryption failed: {error}");
        error
    })?;
    debug!("opened envelope with {} payload bytes", payload.len());
    Ok(payload)
}
