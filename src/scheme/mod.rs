//! Low-level pairing schemes.
//!
//! The structs and traits in this module work directly on group elements. For a higher-level
//! interface, refer to the [`kem`][super::kem] module.
//!
//! To make this module more flexible, all methods that use randomness only use the [`Rng`] bound,
//! not [`CryptoRng`][rand::CryptoRng]. This does not mean that you should use them with insecure
//! randomness, but rather that you need to take care when using these low-level primitives!
//!
//! # Policies
//!
//! Every scheme encrypts for a [`Scheme::Policy`]. For [`BonehBoyen`] this is a single
//! [`IdentityHandle`][crate::policy::IdentityHandle], for [`Wkd`] it is an
//! [`AttributeList`][crate::policy::AttributeList].
//!
//! # Mismatched keys
//!
//! [`SchemeKem::decapsulate`] with a key that does not match the encapsulation does not fail. It
//! returns a well-formed group element that is unrelated to the encapsulated one. An error is
//! only returned when the scheme can tell from the key and context alone that they cannot belong
//! together.
use super::error::Result;

use bls12_381_plus::Gt;
use rand::Rng;

pub mod bb;
pub mod wkd;
pub use self::bb::BonehBoyen;
pub use self::wkd::Wkd;

/// Main trait for the pairing schemes.
///
/// This trait defines setup and key issuance. For encapsulation, the extension [`SchemeKem`]
/// needs to be used.
///
/// Note that this trait represents a scheme *algorithm* not a scheme *instantiation*.
pub trait Scheme {
    /// Type of the public parameters.
    ///
    /// These are sometimes also called the *master public key*.
    type PublicParams;
    /// Type of the master key.
    ///
    /// This is the secret key that can be used to generate the secret key of any policy.
    type MasterKey;
    /// Type of a secret key issued for a single policy.
    type SecretKey;
    /// Type of the policy that is encrypted for, and that keys are issued for.
    type Policy: ?Sized;

    /// Set the system up.
    ///
    /// This method outputs the public parameters and the master key.
    fn setup<R: Rng>(&self, rng: R) -> Result<(Self::PublicParams, Self::MasterKey)>;

    /// Generate the key for the given policy.
    ///
    /// Parameters:
    ///
    /// * `rng` - The randomness to use.
    /// * `public_params` - The public parameters.
    /// * `master_key` - The master key.
    /// * `policy` - The identity or attributes to issue the key for.
    fn generate_key<R: Rng>(
        &self,
        rng: R,
        public_params: &Self::PublicParams,
        master_key: &Self::MasterKey,
        policy: &Self::Policy,
    ) -> Result<Self::SecretKey>;
}

/// Scheme methods to encapsulate target group elements.
pub trait SchemeKem: Scheme {
    /// Type of the encapsulation.
    type Encapsulation;
    /// Additional input that the recipient supplies to decapsulation.
    type Context: ?Sized;

    /// Encapsulates `element` for the given policy.
    ///
    /// Parameters:
    ///
    /// * `rng` - The randomness to use.
    /// * `public_params` - The public parameters.
    /// * `policy` - The policy for which to encapsulate.
    /// * `element` - The element to hide.
    fn encapsulate<R: Rng>(
        &self,
        rng: R,
        public_params: &Self::PublicParams,
        policy: &Self::Policy,
        element: &Gt,
    ) -> Result<Self::Encapsulation>;

    /// Recovers the element from an encapsulation.
    fn decapsulate(
        &self,
        public_params: &Self::PublicParams,
        key: &Self::SecretKey,
        context: &Self::Context,
        encapsulation: &Self::Encapsulation,
    ) -> Result<Gt>;
}
