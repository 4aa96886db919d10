//! Hybrid encryption on top of identity-based and attribute-based key encapsulation.
//!
//! # ⚠️ Warning: Cryptographic Hazmat ☣️
//!
//! This crate is made for prototyping applications and protocols that use identity- or
//! attribute-based encryption. It has *not* been audited, it is *not* battle tested, and *nobody*
//! claims it to be secure.
//!
//! Use it at **your own risk** and if you know what you are doing!
//!
//! # Introduction
//!
//! Pairing-based schemes can only encrypt elements of the pairing target group. To encrypt
//! arbitrary bytes, this crate uses the usual KEM/DEM split:
//!
//! 1. A fresh random [`element::GroupElement`] is sampled.
//! 2. The element is encrypted ("encapsulated") for a recipient identity or an attribute policy.
//! 3. The element is hashed into a [`element::SymmetricKey`].
//! 4. The payload is encrypted with AES-256-GCM under that key.
//!
//! The encapsulation and the AES ciphertext travel together as an [`envelope::Envelope`]. A
//! recipient whose secret key matches the identity or policy recovers the same element, derives
//! the same key and decrypts the payload. Any other key recovers *some* element, derives an
//! unrelated key and fails the authentication check.
//!
//! # Crate Structure
//!
//! The [`scheme`] submodule holds the pairing-level algorithms as [`scheme::Scheme`] (setup and key
//! issuance) and [`scheme::SchemeKem`] (encapsulation of group elements). Two schemes are
//! provided: [`scheme::BonehBoyen`] for identities and [`scheme::Wkd`] (WKD-IBE) for attribute
//! lists.
//!
//! The [`envelope`] submodule composes any [`scheme::SchemeKem`] with [`element`] and [`aead`] into
//! the hybrid construction. Most users want the wrappers in [`kem`] instead:
//! [`kem::IdentityKem`] and [`kem::AttributeKem`] deal with bytes, identities and
//! [`policy::AttributeList`]s instead of group elements.
//!
//! The bridge from application-level identities to scheme-level identities is provided by
//! [`Mapper`], with [`policy::HashMapper`] as the default.
//!
//! # Errors
//!
//! All failures are returned as [`error::Error`]. A key that does not match an envelope leads to
//! either [`error::Error::AccessDenied`] or [`error::Error::IntegrityFailure`]. Use
//! [`error::Error::redact`] before reporting either to an untrusted party.
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger itself. Only sizes and
//! failure kinds are logged, never key material or plaintext.
#[macro_use]
mod macros;

pub mod aead;
pub mod element;
pub mod envelope;
pub mod error;
pub mod kem;
pub mod policy;
pub mod scheme;

use error::Result;

/// A trait to provide byte-level access to objects.
pub trait ByteAccess {
    /// Provides access to the bytes.
    ///
    /// Unlike [`AsRef`], there are no statements made about the performance of this operation.
    /// This operation will allocate a fresh vector, and the byte representation may or may not
    /// have to be computed first.
    fn bytes(&self) -> Vec<u8>;

    /// Provide a short fingerprint of the bytes.
    ///
    /// This can be used to "summarize" long keys when displaying them, to still provide
    /// distinguishing features but to not print out the whole key.
    ///
    /// By default, this method uses the first 16 bytes of the [`ByteAccess::bytes`]
    /// representation, and formats them as a hex string.
    fn fingerprint(&self) -> String {
        let bytes = self.bytes();
        hex::encode(&bytes[..bytes.len().min(16)])
    }
}

/// A trait to mark objects that can map from an application-specific identity to a
/// scheme-specific identity.
///
/// A mapper can be implemented multiple times for a single struct, thereby providing multiple
/// (equivalent) ways to map.
pub trait Mapper<F, T> {
    fn map_identity(&self, input: F) -> Result<T>;
}

/// [`Mapper`] is automatically implemented for functions and closures that match the signature of
/// [`Mapper::map_identity`].
impl<X, Y, F: Fn(X) -> Result<Y>> Mapper<X, Y> for F {
    fn map_identity(&self, input: X) -> Result<Y> {
        self(input)
    }
}
