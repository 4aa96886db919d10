//! Identities, attributes and the rules for matching them.
//!
//! Application-level identities (email addresses, user names, ...) are turned into an
//! [`IdentityHandle`] by a [`Mapper`][crate::Mapper]. The default mapper is [`HashMapper`], which
//! hashes anything implementing [`std::hash::Hash`] with SHA3-256 and reduces the digest to a
//! scalar.
//!
//! Attribute policies are [`AttributeList`]s: a map from small slot indices to
//! [`AttributeValue`]s. Which key opens which ciphertext is decided by the WKD-IBE algebra. The
//! predicates [`satisfies`] and [`can_qualify`] describe that behaviour on the list level.
use super::{error::Result, Mapper};

use std::{
    collections::BTreeMap,
    hash::{Hash, Hasher},
};

use bls12_381_plus::Scalar;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

const IDENTITY_DOMAIN: &[u8] = b"hyseal identity v1";
const ATTRIBUTE_DOMAIN: &[u8] = b"hyseal attribute v1";

/// A [`Hasher`] that feeds SHA3-256.
///
/// Integers are written little-endian and `usize`/`isize` are widened to 64 bit, so the byte
/// stream (and with it the resulting scalar) does not depend on the host platform.
struct Sha3Hasher(Sha3_256);

impl Sha3Hasher {
    fn new(domain: &[u8]) -> Sha3Hasher {
        let mut hasher = Sha3Hasher(Sha3_256::new());
        hasher.write_u64(domain.len() as u64);
        hasher.write(domain);
        hasher
    }

    fn hash_to_scalar(self) -> Scalar {
        let mut bytes = [0; 48];
        bytes[..32].copy_from_slice(&self.0.finalize());
        Scalar::from_okm(&bytes)
    }

    fn hash<H: Hash + ?Sized>(domain: &[u8], element: &H) -> Scalar {
        let mut hasher = Sha3Hasher::new(domain);
        element.hash(&mut hasher);
        hasher.hash_to_scalar()
    }
}

impl Hasher for Sha3Hasher {
    fn finish(&self) -> u64 {
        let digest = self.0.clone().finalize();
        let mut head = [0; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(head)
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn write_u16(&mut self, i: u16) {
        self.write(&i.to_le_bytes());
    }

    fn write_u32(&mut self, i: u32) {
        self.write(&i.to_le_bytes());
    }

    fn write_u64(&mut self, i: u64) {
        self.write(&i.to_le_bytes());
    }

    fn write_u128(&mut self, i: u128) {
        self.write(&i.to_le_bytes());
    }

    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }

    fn write_isize(&mut self, i: isize) {
        self.write_u64(i as i64 as u64);
    }
}

/// The scheme-level representation of an identity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityHandle(pub(crate) Scalar);

impl From<Scalar> for IdentityHandle {
    fn from(value: Scalar) -> Self {
        Self(value)
    }
}

/// A [`Mapper`] that works for all types implementing [`std::hash::Hash`].
///
/// The `Hash` implementation of the input is fed into a domain-separated SHA3-256 instance.
/// Integers and lengths are encoded little-endian with a fixed width, so the mapping is
/// deterministic across processes and platforms, and collisions are as unlikely as they are for
/// SHA3-256. Note that this only holds for the standard `Hash` implementations; a custom one that
/// hashes platform-dependent data carries that dependency over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HashMapper;

impl HashMapper {
    /// Create a new [`HashMapper`].
    pub fn new() -> HashMapper {
        HashMapper
    }
}

impl<I: Hash> Mapper<I, IdentityHandle> for HashMapper {
    fn map_identity(&self, input: I) -> Result<IdentityHandle> {
        Ok(IdentityHandle(Sha3Hasher::hash(IDENTITY_DOMAIN, &input)))
    }
}

/// The value an attribute slot is fixed to.
///
/// Numbers map directly to scalars, strings and byte slices are hashed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeValue(pub(crate) Scalar);

impl From<Scalar> for AttributeValue {
    fn from(value: Scalar) -> Self {
        Self(value)
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        Self(Scalar::from(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self(Sha3Hasher::hash(ATTRIBUTE_DOMAIN, value))
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(value: &[u8]) -> Self {
        Self(Sha3Hasher::hash(ATTRIBUTE_DOMAIN, value))
    }
}

/// An attribute policy, or the attributes a key is issued for.
///
/// A list with fewer slots specifies fewer constraints, but matching is exact, see [`satisfies`].
/// An empty list is valid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeList(BTreeMap<usize, AttributeValue>);

impl AttributeList {
    pub fn new() -> AttributeList {
        AttributeList::default()
    }

    /// Builder-style [`AttributeList::insert`].
    pub fn with<V: Into<AttributeValue>>(mut self, slot: usize, value: V) -> AttributeList {
        self.insert(slot, value);
        self
    }

    /// Fixes `slot` to `value`, returning the value it was fixed to before.
    pub fn insert<V: Into<AttributeValue>>(
        &mut self,
        slot: usize,
        value: V,
    ) -> Option<AttributeValue> {
        self.0.insert(slot, value.into())
    }

    pub fn get(&self, slot: usize) -> Option<&AttributeValue> {
        self.0.get(&slot)
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.0.contains_key(&slot)
    }

    /// The fixed slots, in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &AttributeValue)> + '_ {
        self.0.iter().map(|(slot, value)| (*slot, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The highest fixed slot, if any.
    pub(crate) fn max_slot(&self) -> Option<usize> {
        self.0.keys().next_back().copied()
    }
}

impl<V: Into<AttributeValue>> FromIterator<(usize, V)> for AttributeList {
    fn from_iter<T: IntoIterator<Item = (usize, V)>>(iter: T) -> Self {
        let mut list = AttributeList::new();
        for (slot, value) in iter {
            list.insert(slot, value);
        }
        list
    }
}

/// Whether a key issued for `key` opens encapsulations made for `policy` as is.
///
/// WKD-IBE decapsulation only recovers the right element if both lists fix exactly the same slots
/// to exactly the same values. A key with fewer fixed slots does *not* open a more specific
/// policy directly; it has to be qualified first (see [`can_qualify`]). A key with more fixed
/// slots never opens a less specific policy.
pub fn satisfies(key: &AttributeList, policy: &AttributeList) -> bool {
    key == policy
}

/// Whether a key issued for `key` can be qualified to open encapsulations made for `policy`.
///
/// This holds if every slot fixed in `key` is fixed to the same value in `policy`. Whether the key
/// still carries the delegation components for the remaining slots is checked by
/// [`Wkd::qualify_key`][crate::scheme::Wkd::qualify_key].
pub fn can_qualify(key: &AttributeList, policy: &AttributeList) -> bool {
    key.iter()
        .all(|(slot, value)| policy.get(slot) == Some(value))
}
