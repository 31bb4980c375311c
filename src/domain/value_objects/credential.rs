//! Credential Value Object
//!
//! Secrets (repository token, remote login password) travel through the
//! pipeline wrapped in `Credential` so that `Debug` and `Display` never
//! print them. The raw value is only reachable through `expose()`.

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    const MASK: &'static str = "********";

    /// Wrap a secret, rejecting blank input
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return None;
        }
        Some(Self(secret))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Replace every occurrence of the secret in `text` with a mask
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.0, Self::MASK)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", Self::MASK)
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::MASK)
    }
}
