//! High-level wrappers around the scheme operations.
//!
//! Usually, people don't communicate by sending each other group elements. Therefore, we provide
//! this opinionated and easier-to-use wrapper over the raw scheme operations.
//!
//! There is one wrapper per policy mode:
//!
//! * [`IdentityKem`] encrypts for a single recipient identity, using [`BonehBoyen`]. Identities
//!   are mapped through a [`Mapper`], which makes it easier to specify identities at the
//!   call-site. The default is [`HashMapper`], so an email address can be used as is.
//! * [`AttributeKem`] encrypts for an [`AttributeList`], using [`Wkd`].
//!
//! Compared to the raw schemes, the main differences are:
//!
//! * Encapsulated group elements are hashed to a [`SymmetricKey`] (256 bit) using SHA3 to make it
//!   easy to use them in other cryptographic primitives.
//! * Encryption and decryption is realized by using hybrid encryption, with the KEM and AES-GCM on
//!   top. This allows you to easily encrypt byte sequences instead of group elements.
//! * The methods in this module are restricted to [`CryptoRng`] random generators to enforce the
//!   use of cryptographically secure algorithms.
use super::{
    element::{derive_key, GroupElement, SymmetricKey},
    envelope::{self, Envelope},
    error::Result,
    policy::{AttributeList, HashMapper, IdentityHandle},
    scheme::{bb, wkd, BonehBoyen, Scheme, SchemeKem, Wkd},
    Mapper,
};

use rand::{CryptoRng, Rng};

/// Envelope produced by [`IdentityKem::seal`].
pub type IdentityEnvelope = Envelope<bb::Encapsulation>;

/// Envelope produced by [`AttributeKem::seal`].
pub type AttributeEnvelope = Envelope<wkd::Encapsulation>;

/// High-level identity-based encryption.
///
/// This struct internally uses the [`BonehBoyen`] IBE, and keeps a [`Mapper`] around to do the
/// mapping of application identities to [`IdentityHandle`]s.
#[derive(Clone, Debug, Default)]
pub struct IdentityKem<M = HashMapper> {
    scheme: BonehBoyen,
    mapper: M,
}

impl IdentityKem<HashMapper> {
    /// Create a new [`IdentityKem`] using the [`HashMapper`] mapper.
    pub fn new() -> IdentityKem<HashMapper> {
        Self::new_with_mapper(HashMapper)
    }
}

impl<M> IdentityKem<M> {
    /// Create a new [`IdentityKem`] with the given [`Mapper`].
    pub fn new_with_mapper(mapper: M) -> IdentityKem<M> {
        Self {
            scheme: BonehBoyen::new(),
            mapper,
        }
    }

    /// Sets up the system parameters.
    ///
    /// This operation will return the public parameters and the master key.
    pub fn setup<R: Rng + CryptoRng>(&self, rng: R) -> Result<(bb::PublicParams, bb::MasterKey)> {
        self.scheme.setup(rng)
    }

    /// Generates the secret key for an identity using the master key.
    ///
    /// Parameters:
    ///
    /// * `rng` - The randomness to use.
    /// * `public_params` - The public parameters of the system.
    /// * `master_key` - The master key.
    /// * `identity` - The identity for which to generate the key.
    pub fn generate_key<I, R: Rng + CryptoRng>(
        &self,
        rng: R,
        public_params: &bb::PublicParams,
        master_key: &bb::MasterKey,
        identity: I,
    ) -> Result<bb::SecretKey>
    where
        M: Mapper<I, IdentityHandle>,
    {
        let identity = self.mapper.map_identity(identity)?;
        self.scheme
            .generate_key(rng, public_params, master_key, &identity)
    }

    /// Encapsulate a key for the given identity.
    ///
    /// This returns the key and its encapsulation.
    ///
    /// Parameters:
    ///
    /// * `rng` - The randomness to use.
    /// * `public_params` - The public parameters of the system.
    /// * `identity` - The identity for which to generate the key.
    pub fn encapsulate<I, R: Rng + CryptoRng>(
        &self,
        mut rng: R,
        public_params: &bb::PublicParams,
        identity: I,
    ) -> Result<(SymmetricKey, bb::Encapsulation)>
    where
        M: Mapper<I, IdentityHandle>,
    {
        let identity = self.mapper.map_identity(identity)?;
        let element = GroupElement::sample(&mut rng)?;
        let encapsulation =
            self.scheme
                .encapsulate(&mut rng, public_params, &identity, element.inner())?;
        Ok((derive_key(&element), encapsulation))
    }

    /// Decapsulate the given key.
    ///
    /// If the correct secret key is given, this will return the same key that the corresponding
    /// [`IdentityKem::encapsulate`] call also returned.
    ///
    /// Parameters:
    ///
    /// * `public_params` - The public parameters of the system.
    /// * `key` - The secret key of the receiving identity.
    /// * `identity` - The identity of the receiver.
    /// * `encapsulation` - The encapsulation of the key.
    pub fn decapsulate<I>(
        &self,
        public_params: &bb::PublicParams,
        key: &bb::SecretKey,
        identity: I,
        encapsulation: &bb::Encapsulation,
    ) -> Result<SymmetricKey>
    where
        M: Mapper<I, IdentityHandle>,
    {
        let identity = self.mapper.map_identity(identity)?;
        let element = self
            .scheme
            .decapsulate(public_params, key, &identity, encapsulation)?;
        Ok(derive_key(&GroupElement::from(element)))
    }

    /// Encrypt the given byte sequence for the given identity.
    ///
    /// Parameters:
    ///
    /// * `rng` - The randomness to use.
    /// * `public_params` - The public parameters of the system.
    /// * `identity` - The identity for which to encrypt the payload.
    /// * `payload` - Payload to encrypt.
    pub fn seal<I, R: Rng + CryptoRng>(
        &self,
        rng: R,
        public_params: &bb::PublicParams,
        identity: I,
        payload: &[u8],
    ) -> Result<IdentityEnvelope>
    where
        M: Mapper<I, IdentityHandle>,
    {
        let identity = self.mapper.map_identity(identity)?;
        envelope::seal(&self.scheme, rng, public_params, &identity, payload)
    }

    /// Decrypt the given envelope.
    ///
    /// Returns the payload.
    ///
    /// Parameters:
    ///
    /// * `public_params` - The public parameters of the system.
    /// * `key` - The secret key of the receiving identity.
    /// * `identity` - The identity of the receiver.
    /// * `envelope` - The envelope, as previously returned by [`IdentityKem::seal`].
    pub fn open<I>(
        &self,
        public_params: &bb::PublicParams,
        key: &bb::SecretKey,
        identity: I,
        envelope: &IdentityEnvelope,
    ) -> Result<Vec<u8>>
    where
        M: Mapper<I, IdentityHandle>,
    {
        let identity = self.mapper.map_identity(identity)?;
        envelope::open(&self.scheme, public_params, key, &identity, envelope)
    }
}

/// High-level attribute-based encryption.
///
/// This struct internally uses the [`Wkd`] scheme with a fixed number of attribute slots.
#[derive(Clone, Debug)]
pub struct AttributeKem {
    scheme: Wkd,
}

impl AttributeKem {
    /// Create a new [`AttributeKem`].
    ///
    /// Parameters:
    ///
    /// * `slots` - Number of attribute slots the system should support.
    pub fn new(slots: usize) -> AttributeKem {
        Self::wrap(Wkd::new(slots))
    }

    /// Wraps an existing [`Wkd`] scheme.
    pub fn wrap(scheme: Wkd) -> AttributeKem {
        Self { scheme }
    }

    /// Sets up the system parameters.
    ///
    /// This operation will return the public parameters and the master key.
    pub fn setup<R: Rng + CryptoRng>(
        &self,
        rng: R,
    ) -> Result<(wkd::PublicParams, wkd::MasterKey)> {
        self.scheme.setup(rng)
    }

    /// Generates the secret key for an attribute list using the master key.
    pub fn generate_key<R: Rng + CryptoRng>(
        &self,
        rng: R,
        public_params: &wkd::PublicParams,
        master_key: &wkd::MasterKey,
        attributes: &AttributeList,
    ) -> Result<wkd::SecretKey> {
        self.scheme
            .generate_key(rng, public_params, master_key, attributes)
    }

    /// Derives a key for a more specific attribute list, see [`Wkd::qualify_key`].
    pub fn qualify_key<R: Rng + CryptoRng>(
        &self,
        rng: R,
        public_params: &wkd::PublicParams,
        key: &wkd::SecretKey,
        attributes: &AttributeList,
    ) -> Result<wkd::SecretKey> {
        self.scheme.qualify_key(rng, public_params, key, attributes)
    }

    /// Strips the ability to qualify `key` any further.
    pub fn restrict_delegation(&self, key: &wkd::SecretKey) -> wkd::SecretKey {
        key.restrict_delegation()
    }

    /// Encapsulate a key for the given attributes.
    ///
    /// This returns the key and its encapsulation.
    pub fn encapsulate<R: Rng + CryptoRng>(
        &self,
        mut rng: R,
        public_params: &wkd::PublicParams,
        attributes: &AttributeList,
    ) -> Result<(SymmetricKey, wkd::Encapsulation)> {
        let element = GroupElement::sample(&mut rng)?;
        let encapsulation =
            self.scheme
                .encapsulate(&mut rng, public_params, attributes, element.inner())?;
        Ok((derive_key(&element), encapsulation))
    }

    /// Decapsulate the given key.
    pub fn decapsulate(
        &self,
        public_params: &wkd::PublicParams,
        key: &wkd::SecretKey,
        encapsulation: &wkd::Encapsulation,
    ) -> Result<SymmetricKey> {
        let element = self
            .scheme
            .decapsulate(public_params, key, &(), encapsulation)?;
        Ok(derive_key(&GroupElement::from(element)))
    }

    /// Encrypt the given byte sequence for the given attributes.
    pub fn seal<R: Rng + CryptoRng>(
        &self,
        rng: R,
        public_params: &wkd::PublicParams,
        attributes: &AttributeList,
        payload: &[u8],
    ) -> Result<AttributeEnvelope> {
        envelope::seal(&self.scheme, rng, public_params, attributes, payload)
    }

    /// Decrypt the given envelope.
    ///
    /// This only succeeds if `key` was issued (or qualified) for exactly the attributes the
    /// envelope was sealed for.
    pub fn open(
        &self,
        public_params: &wkd::PublicParams,
        key: &wkd::SecretKey,
        envelope: &AttributeEnvelope,
    ) -> Result<Vec<u8>> {
        envelope::open(&self.scheme, public_params, key, &(), envelope)
    }
}
