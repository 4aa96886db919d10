//! Target group elements and the symmetric keys derived from them.
//!
//! A fresh [`GroupElement`] is the secret that every envelope encapsulates. Both sides turn it
//! into a [`SymmetricKey`] with [`derive_key`], which is a plain SHA3-256 over the canonical byte
//! encoding of the element.
use super::{error::Result, ByteAccess};

use std::fmt::{self, Debug};

use bls12_381_plus::{group::Group, Gt, Scalar};
use rand::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a derived [`SymmetricKey`] in bytes.
pub const KEY_SIZE: usize = 32;

/// Number of random bytes that are reduced to a scalar when sampling.
const SAMPLE_BYTES: usize = 48;

/// Draws a uniformly random scalar.
///
/// Unlike `Field::random`, this uses [`RngCore::try_fill_bytes`] and reports a failing source as
/// [`Error::EntropySource`][crate::error::Error::EntropySource].
pub(crate) fn random_scalar<R: RngCore>(mut rng: R) -> Result<Scalar> {
    let mut okm = [0u8; SAMPLE_BYTES];
    rng.try_fill_bytes(&mut okm)?;
    let scalar = Scalar::from_okm(&okm);
    okm.zeroize();
    Ok(scalar)
}

/// An element of the pairing target group.
///
/// Two elements are equal iff their canonical encodings are equal.
#[derive(Clone, Copy)]
pub struct GroupElement(Gt);

impl GroupElement {
    /// Draws a uniformly random element of the target group.
    ///
    /// The randomness is pulled with [`RngCore::try_fill_bytes`], so an exhausted or unavailable
    /// source surfaces as [`Error::EntropySource`][crate::error::Error::EntropySource] instead of a
    /// panic.
    pub fn sample<R: RngCore + CryptoRng>(rng: R) -> Result<GroupElement> {
        Ok(GroupElement(Gt::generator() * random_scalar(rng)?))
    }

    /// The canonical byte encoding of the element.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    pub(crate) fn inner(&self) -> &Gt {
        &self.0
    }
}

impl From<Gt> for GroupElement {
    fn from(value: Gt) -> Self {
        Self(value)
    }
}

impl PartialEq for GroupElement {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bytes()[..] == other.0.to_bytes()[..]
    }
}

impl Eq for GroupElement {}

impl ByteAccess for GroupElement {
    fn bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl Debug for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GroupElement")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Key material for a single authenticated encryption.
///
/// The bytes are wiped when the key is dropped. The debug output never shows them.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// Hashes a group element into a [`SymmetricKey`].
///
/// This is a pure function of the element's canonical encoding.
pub fn derive_key(element: &GroupElement) -> SymmetricKey {
    let mut result = [0; KEY_SIZE];
    result.copy_from_slice(&Sha3_256::digest(element.0.to_bytes()));
    SymmetricKey(result)
}
