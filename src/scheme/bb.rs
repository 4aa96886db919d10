//! Boneh–Boyen identity-based encryption of target group elements.
//!
//! This is the single-level case of the Boneh–Boyen–Goh HIBE: one identity element, no
//! hierarchy, no delegation.
use super::{Scheme, SchemeKem};
use crate::{
    element::random_scalar,
    error::{Error, Result},
    policy::IdentityHandle,
};

use bls12_381_plus::{group::Group, pairing, G1Affine, G2Affine, G2Projective, Gt};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BonehBoyen;

impl BonehBoyen {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PublicParams {
    g: G1Affine,
    g1: G1Affine,
    g2: G2Affine,
    g3: G2Affine,
    h: G2Affine,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MasterKey(G2Affine);

/// A secret key, bound to the identity it was issued for.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SecretKey {
    a0: G2Affine,
    a1: G1Affine,
    identity: IdentityHandle,
}

impl SecretKey {
    pub fn identity(&self) -> &IdentityHandle {
        &self.identity
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct Encapsulation {
    a: Gt,
    b: G1Affine,
    c: G2Affine,
}

impl_fingerprint!(PublicParams, MasterKey, SecretKey, Encapsulation);

impl Scheme for BonehBoyen {
    type PublicParams = PublicParams;
    type MasterKey = MasterKey;
    type SecretKey = SecretKey;
    type Policy = IdentityHandle;

    fn setup<R: Rng>(&self, mut rng: R) -> Result<(Self::PublicParams, Self::MasterKey)> {
        let g = G1Affine::generator();
        let alpha = random_scalar(&mut rng)?;
        let g1 = g * alpha;
        let g2 = G2Projective::generator() * random_scalar(&mut rng)?;
        let g3 = G2Projective::generator() * random_scalar(&mut rng)?;
        let h = G2Projective::generator() * random_scalar(&mut rng)?;
        Ok((
            PublicParams {
                g,
                g1: g1.into(),
                g2: g2.into(),
                g3: g3.into(),
                h: h.into(),
            },
            MasterKey((g2 * alpha).into()),
        ))
    }

    fn generate_key<R: Rng>(
        &self,
        rng: R,
        public_params: &Self::PublicParams,
        master_key: &Self::MasterKey,
        identity: &Self::Policy,
    ) -> Result<Self::SecretKey> {
        let r = random_scalar(rng)?;
        Ok(SecretKey {
            a0: (&master_key.0 + (public_params.h * identity.0 + public_params.g3) * r).into(),
            a1: (public_params.g * r).into(),
            identity: *identity,
        })
    }
}

impl SchemeKem for BonehBoyen {
    type Encapsulation = Encapsulation;
    type Context = IdentityHandle;

    fn encapsulate<R: Rng>(
        &self,
        rng: R,
        public_params: &Self::PublicParams,
        identity: &Self::Policy,
        element: &Gt,
    ) -> Result<Self::Encapsulation> {
        let s = random_scalar(rng)?;
        Ok(Encapsulation {
            a: pairing(&public_params.g1, &public_params.g2) * s + element,
            b: (public_params.g * s).into(),
            c: ((public_params.h * identity.0 + public_params.g3) * s).into(),
        })
    }

    /// Recovers the element.
    ///
    /// The `identity` is the one the recipient expects the encapsulation to be for. If the key
    /// was issued for a different identity, this fails with [`Error::AccessDenied`].
    fn decapsulate(
        &self,
        _: &Self::PublicParams,
        key: &Self::SecretKey,
        identity: &Self::Context,
        encapsulation: &Self::Encapsulation,
    ) -> Result<Gt> {
        if key.identity != *identity {
            return Err(Error::AccessDenied);
        }
        let Encapsulation { a, b, c } = encapsulation;
        Ok(a + pairing(&key.a1, c) - pairing(b, &key.a0))
    }
}
