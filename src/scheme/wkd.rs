//! WKD-IBE (wildcarded key derivation IBE) over a fixed number of attribute slots.
//!
//! Keys and ciphertexts are bound to an [`AttributeList`]. A key opens an encapsulation only if
//! its list is exactly the encapsulation's list. A key keeps one delegation component per slot
//! it leaves free, and [`Wkd::qualify_key`] uses those to fix further slots.
use std::collections::BTreeMap;

use super::{Scheme, SchemeKem};
use crate::{
    element::random_scalar,
    error::{Error, Result},
    policy::AttributeList,
};

use bls12_381_plus::{group::Group, pairing, G1Affine, G2Affine, G2Projective, Gt};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wkd {
    slots: usize,
}

impl Wkd {
    pub fn new(slots: usize) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Derives a key for `attributes` from a key for a subset of them.
    ///
    /// Every slot fixed in `key` must be fixed to the same value in `attributes`, and `key` must
    /// still carry the delegation component of every slot that gets fixed. The new key is
    /// re-randomized, it is not linkable to `key`.
    ///
    /// Parameters:
    ///
    /// * `rng` - The randomness to use.
    /// * `public_params` - The public parameters.
    /// * `key` - The key to qualify.
    /// * `attributes` - The attributes of the new key.
    pub fn qualify_key<R: Rng>(
        &self,
        rng: R,
        public_params: &PublicParams,
        key: &SecretKey,
        attributes: &AttributeList,
    ) -> Result<SecretKey> {
        for (slot, value) in key.attributes.iter() {
            if attributes.get(slot) != Some(value) {
                return Err(Error::AttributeConflict { slot });
            }
        }

        let point = policy_point(public_params, attributes)?;
        let mut a0 = G2Projective::from(key.a0);
        for (slot, value) in attributes.iter() {
            if key.attributes.contains(slot) {
                continue;
            }
            let b = key.free.get(&slot).ok_or(Error::NotDelegable { slot })?;
            a0 += b * value.0;
        }

        let t = random_scalar(rng)?;
        let a0 = a0 + point * t;
        let free = key
            .free
            .iter()
            .filter(|(slot, _)| !attributes.contains(**slot))
            .map(|(slot, b)| -> Result<(usize, G2Affine)> {
                let h = public_params
                    .hs
                    .get(*slot)
                    .ok_or(Error::AttributeSlotOutOfRange {
                        slot: *slot,
                        slots: public_params.slots(),
                    })?;
                Ok((*slot, (b + h * t).into()))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(SecretKey {
            a0: a0.into(),
            a1: (key.a1 + public_params.g * t).into(),
            free,
            attributes: attributes.clone(),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PublicParams {
    g: G1Affine,
    g1: G1Affine,
    g2: G2Affine,
    g3: G2Affine,
    hs: Vec<G2Affine>,
}

impl PublicParams {
    /// Number of attribute slots these parameters support.
    pub fn slots(&self) -> usize {
        self.hs.len()
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MasterKey(G2Affine);

/// A secret key, bound to the attribute list it was issued for.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SecretKey {
    a0: G2Affine,
    a1: G1Affine,
    free: BTreeMap<usize, G2Affine>,
    attributes: AttributeList,
}

impl SecretKey {
    /// The attributes this key was issued for.
    pub fn attributes(&self) -> &AttributeList {
        &self.attributes
    }

    /// Whether [`Wkd::qualify_key`] can fix any further slot of this key.
    pub fn is_delegable(&self) -> bool {
        !self.free.is_empty()
    }

    /// Drops all delegation components.
    ///
    /// The result opens exactly the same encapsulations, but can no longer be qualified.
    pub fn restrict_delegation(&self) -> SecretKey {
        SecretKey {
            free: BTreeMap::new(),
            ..self.clone()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct Encapsulation {
    a: Gt,
    b: G1Affine,
    c: G2Affine,
}

impl_fingerprint!(PublicParams, MasterKey, SecretKey, Encapsulation);

/// Computes `g3 * prod(h_i ^ v_i)` over the fixed slots.
fn policy_point(public_params: &PublicParams, attributes: &AttributeList) -> Result<G2Projective> {
    let mut point = G2Projective::from(public_params.g3);
    for (slot, value) in attributes.iter() {
        let h = public_params
            .hs
            .get(slot)
            .ok_or(Error::AttributeSlotOutOfRange {
                slot,
                slots: public_params.slots(),
            })?;
        point += h * value.0;
    }
    Ok(point)
}

impl Scheme for Wkd {
    type PublicParams = PublicParams;
    type MasterKey = MasterKey;
    type SecretKey = SecretKey;
    type Policy = AttributeList;

    fn setup<R: Rng>(&self, mut rng: R) -> Result<(Self::PublicParams, Self::MasterKey)> {
        let g = G1Affine::generator();
        let alpha = random_scalar(&mut rng)?;
        let g1 = g * alpha;
        let g2 = G2Projective::generator() * random_scalar(&mut rng)?;
        let g3 = G2Projective::generator() * random_scalar(&mut rng)?;
        let hs = (0..self.slots())
            .map(|_| -> Result<G2Affine> {
                Ok((G2Projective::generator() * random_scalar(&mut rng)?).into())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((
            PublicParams {
                g,
                g1: g1.into(),
                g2: g2.into(),
                g3: g3.into(),
                hs,
            },
            MasterKey((g2 * alpha).into()),
        ))
    }

    fn generate_key<R: Rng>(
        &self,
        rng: R,
        public_params: &Self::PublicParams,
        master_key: &Self::MasterKey,
        attributes: &Self::Policy,
    ) -> Result<Self::SecretKey> {
        let point = policy_point(public_params, attributes)?;
        let r = random_scalar(rng)?;
        Ok(SecretKey {
            a0: (&master_key.0 + point * r).into(),
            a1: (public_params.g * r).into(),
            free: public_params
                .hs
                .iter()
                .enumerate()
                .filter(|(slot, _)| !attributes.contains(*slot))
                .map(|(slot, h)| (slot, (h * r).into()))
                .collect::<BTreeMap<usize, G2Affine>>(),
            attributes: attributes.clone(),
        })
    }
}

impl SchemeKem for Wkd {
    type Encapsulation = Encapsulation;
    type Context = ();

    fn encapsulate<R: Rng>(
        &self,
        rng: R,
        public_params: &Self::PublicParams,
        attributes: &Self::Policy,
        element: &Gt,
    ) -> Result<Self::Encapsulation> {
        let point = policy_point(public_params, attributes)?;
        let s = random_scalar(rng)?;
        Ok(Encapsulation {
            a: pairing(&public_params.g1, &public_params.g2) * s + element,
            b: (public_params.g * s).into(),
            c: (point * s).into(),
        })
    }

    /// Recovers the element.
    ///
    /// Fails with [`Error::AccessDenied`] only if the key refers to slots that `public_params`
    /// does not have, i.e. it was issued under different parameters.
    fn decapsulate(
        &self,
        public_params: &Self::PublicParams,
        key: &Self::SecretKey,
        _: &Self::Context,
        encapsulation: &Self::Encapsulation,
    ) -> Result<Gt> {
        let highest = key
            .attributes
            .max_slot()
            .into_iter()
            .chain(key.free.keys().next_back().copied())
            .max();
        if highest.map_or(false, |slot| slot >= public_params.slots()) {
            return Err(Error::AccessDenied);
        }
        let Encapsulation { a, b, c } = encapsulation;
        Ok(a + pairing(&key.a1, c) - pairing(b, &key.a0))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::test::BudgetRng;

    use bls12_381_plus::{ff::Field, Scalar};

    fn engineering() -> AttributeList {
        AttributeList::new().with(0, "engineering")
    }

    fn senior_engineering() -> AttributeList {
        AttributeList::new()
            .with(0, "engineering")
            .with(1, "senior")
    }

    fn roundtrip(
        wkd: &Wkd,
        public_params: &PublicParams,
        key: &SecretKey,
        policy: &AttributeList,
    ) -> bool {
        let mut rng = rand::thread_rng();
        let element = Gt::generator() * Scalar::random(&mut rng);
        let encapsulation = wkd
            .encapsulate(&mut rng, public_params, policy, &element)
            .unwrap();
        let decapsulation = wkd
            .decapsulate(public_params, key, &(), &encapsulation)
            .unwrap();
        element == decapsulation
    }

    #[test]
    fn encapsulate_decapsulate_exact() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(4);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let key = wkd
            .generate_key(&mut rng, &public_params, &master_key, &senior_engineering())
            .unwrap();
        assert!(roundtrip(&wkd, &public_params, &key, &senior_engineering()));
    }

    #[test]
    fn encapsulate_decapsulate_empty() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(4);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let key = wkd
            .generate_key(&mut rng, &public_params, &master_key, &AttributeList::new())
            .unwrap();
        assert!(roundtrip(&wkd, &public_params, &key, &AttributeList::new()));
        assert!(!roundtrip(&wkd, &public_params, &key, &engineering()));
    }

    #[test]
    fn encapsulate_decapsulate_all_slots() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(3);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let policy: AttributeList = [(0, 1u64), (1, 2), (2, 3)].into_iter().collect();
        let key = wkd
            .generate_key(&mut rng, &public_params, &master_key, &policy)
            .unwrap();
        assert!(!key.is_delegable());
        assert!(roundtrip(&wkd, &public_params, &key, &policy));
    }

    #[test]
    fn partial_key_fails() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(4);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let key = wkd
            .generate_key(&mut rng, &public_params, &master_key, &engineering())
            .unwrap();
        assert!(!roundtrip(&wkd, &public_params, &key, &senior_engineering()));
    }

    #[test]
    fn superset_key_fails() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(4);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let key = wkd
            .generate_key(&mut rng, &public_params, &master_key, &senior_engineering())
            .unwrap();
        assert!(!roundtrip(&wkd, &public_params, &key, &engineering()));
    }

    #[test]
    fn qualified_key_opens() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(4);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let key = wkd
            .generate_key(&mut rng, &public_params, &master_key, &engineering())
            .unwrap();
        let qualified = wkd
            .qualify_key(&mut rng, &public_params, &key, &senior_engineering())
            .unwrap();
        assert_eq!(qualified.attributes(), &senior_engineering());
        assert!(roundtrip(&wkd, &public_params, &qualified, &senior_engineering()));
        assert!(!roundtrip(&wkd, &public_params, &qualified, &engineering()));
    }

    #[test]
    fn qualify_twice() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(4);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let root = wkd
            .generate_key(&mut rng, &public_params, &master_key, &AttributeList::new())
            .unwrap();
        let first = wkd
            .qualify_key(&mut rng, &public_params, &root, &engineering())
            .unwrap();
        let full = senior_engineering().with(3, 7u64);
        let second = wkd
            .qualify_key(&mut rng, &public_params, &first, &full)
            .unwrap();
        assert!(roundtrip(&wkd, &public_params, &first, &engineering()));
        assert!(roundtrip(&wkd, &public_params, &second, &full));
    }

    #[test]
    fn qualify_conflict() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(4);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let key = wkd
            .generate_key(&mut rng, &public_params, &master_key, &senior_engineering())
            .unwrap();
        let sales = AttributeList::new().with(0, "sales").with(1, "senior");
        assert!(matches!(
            wkd.qualify_key(&mut rng, &public_params, &key, &sales),
            Err(Error::AttributeConflict { slot: 0 })
        ));
        assert!(matches!(
            wkd.qualify_key(&mut rng, &public_params, &key, &engineering()),
            Err(Error::AttributeConflict { slot: 1 })
        ));
    }

    #[test]
    fn restricted_key() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(4);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let key = wkd
            .generate_key(&mut rng, &public_params, &master_key, &engineering())
            .unwrap();
        assert!(key.is_delegable());
        let restricted = key.restrict_delegation();
        assert!(!restricted.is_delegable());
        assert!(roundtrip(&wkd, &public_params, &restricted, &engineering()));
        assert!(matches!(
            wkd.qualify_key(&mut rng, &public_params, &restricted, &senior_engineering()),
            Err(Error::NotDelegable { slot: 1 })
        ));
        let rerandomized = wkd
            .qualify_key(&mut rng, &public_params, &restricted, &engineering())
            .unwrap();
        assert!(rerandomized != restricted);
        assert!(roundtrip(&wkd, &public_params, &rerandomized, &engineering()));
    }

    #[test]
    fn slot_out_of_range() {
        let mut rng = rand::thread_rng();
        let wkd = Wkd::new(2);
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        let policy = AttributeList::new().with(2, "too far");
        assert!(matches!(
            wkd.generate_key(&mut rng, &public_params, &master_key, &policy),
            Err(Error::AttributeSlotOutOfRange { slot: 2, slots: 2 })
        ));
        let element = Gt::generator();
        assert!(matches!(
            wkd.encapsulate(&mut rng, &public_params, &policy, &element),
            Err(Error::AttributeSlotOutOfRange { slot: 2, slots: 2 })
        ));
    }

    #[test]
    fn exhausted_rng_is_reported() {
        let wkd = Wkd::new(2);
        assert!(matches!(
            wkd.setup(BudgetRng::new(5 * 48 - 1)),
            Err(Error::EntropySource(_))
        ));
        assert!(wkd.setup(BudgetRng::new(5 * 48)).is_ok());

        let mut rng = rand::thread_rng();
        let (public_params, master_key) = wkd.setup(&mut rng).unwrap();
        assert!(matches!(
            wkd.generate_key(BudgetRng::new(0), &public_params, &master_key, &engineering()),
            Err(Error::EntropySource(_))
        ));
        let key = wkd
            .generate_key(&mut rng, &public_params, &master_key, &engineering())
            .unwrap();
        assert!(matches!(
            wkd.qualify_key(BudgetRng::new(47), &public_params, &key, &senior_engineering()),
            Err(Error::EntropySource(_))
        ));
        assert!(matches!(
            wkd.encapsulate(BudgetRng::new(0), &public_params, &engineering(), &Gt::generator()),
            Err(Error::EntropySource(_))
        ));
    }

    #[test]
    fn foreign_key_is_denied() {
        let mut rng = rand::thread_rng();
        let large = Wkd::new(4);
        let small = Wkd::new(2);
        let (large_params, large_master) = large.setup(&mut rng).unwrap();
        let (small_params, _) = small.setup(&mut rng).unwrap();
        let key = large
            .generate_key(&mut rng, &large_params, &large_master, &engineering())
            .unwrap();
        let encapsulation = small
            .encapsulate(&mut rng, &small_params, &engineering(), &Gt::generator())
            .unwrap();
        assert!(matches!(
            small.decapsulate(&small_params, &key, &(), &encapsulation),
            Err(Error::AccessDenied)
        ));
    }
}
