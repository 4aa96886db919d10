/// Implements [`ByteAccess`][crate::ByteAccess] through `bincode` and a [`Debug`][std::fmt::Debug]
/// that only shows the fingerprint.
///
/// The values involved are too long to show nicely, and some of them are secret.
macro_rules! impl_fingerprint {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::ByteAccess for $ty {
                fn bytes(&self) -> Vec<u8> {
                    bincode::serialize(self).unwrap_or_default()
                }
            }

            impl std::fmt::Debug for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_tuple(stringify!($ty))
                        .field(&$crate::ByteAccess::fingerprint(self))
                        .finish()
                }
            }
        )+
    };
}
