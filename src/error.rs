use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The random source failed to provide entropy")]
    EntropySource(#[from] rand::Error),
    #[error("The secret key does not match the encapsulation")]
    AccessDenied,
    #[error("The ciphertext failed authentication")]
    IntegrityFailure,
    #[error("The symmetric cipher could not be initialized")]
    CipherInitialization,
    #[error("The payload exceeds the size limit of the symmetric cipher")]
    PayloadTooLarge,
    #[error("The supplied envelope was malformed")]
    MalformedEnvelope,
    #[error("Attribute slot {slot} is out of range (the parameters have {slots} slots)")]
    AttributeSlotOutOfRange { slot: usize, slots: usize },
    #[error("Attribute slot {slot} is already fixed to a different value")]
    AttributeConflict { slot: usize },
    #[error("The key cannot be qualified in attribute slot {slot}")]
    NotDelegable { slot: usize },
    #[error("Decryption was denied")]
    Denied,
}

impl Error {
    /// Returns `true` if the error means "this key cannot open this envelope".
    pub fn is_denial(&self) -> bool {
        matches!(self, Error::AccessDenied | Error::IntegrityFailure | Error::Denied)
    }

    /// Folds the access-control failures into the generic [`Error::Denied`].
    ///
    /// [`Error::AccessDenied`] and [`Error::IntegrityFailure`] are kept apart for diagnostics
    /// only. Anything reported to an untrusted party should go through this method first, so that
    /// the two cannot be told apart.
    pub fn redact(self) -> Error {
        if self.is_denial() {
            Error::Denied
        } else {
            self
        }
    }
}

pub type Result<V, E=Error> = std::result::Result<V, E>;
