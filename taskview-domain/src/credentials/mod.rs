//! Where the bearer credential comes from.
//!
//! The controller reads the credential through [`CredentialSource`] on every
//! operation, so a `login` performed in between is picked up without rebuilding
//! anything. [`FileCredentialStore`] keeps it in a small JSON key/value file in the
//! application data directory; [`StaticCredential`] serves a fixed value (an
//! environment variable, or a test).

pub mod errors;
pub mod file_store;

use async_trait::async_trait;
use std::fmt;

pub use errors::CredentialError;
pub use file_store::FileCredentialStore;

/// An opaque signed bearer token. `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace-only tokens count as absent.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} bytes>)", self.0.len())
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Read access to the current credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// `Ok(None)` when nobody is signed in. Blank values are reported as `None`.
    async fn load_credential(&self) -> Result<Option<Credential>, CredentialError>;
}

/// A credential fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential {
    credential: Option<Credential>,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self { credential: Some(Credential::new(token)) }
    }

    pub fn none() -> Self {
        Self { credential: None }
    }
}

#[async_trait]
impl CredentialSource for StaticCredential {
    async fn load_credential(&self) -> Result<Option<Credential>, CredentialError> {
        Ok(self.credential.clone().filter(|c| !c.is_blank()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_hides_token() {
        let credential = Credential::new("secret.token.value");
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("18 bytes"));
    }

    #[test]
    fn test_blank_credential() {
        assert!(Credential::new("   ").is_blank());
        assert!(Credential::new("").is_blank());
        assert!(!Credential::new("a.b.c").is_blank());
    }

    #[tokio::test]
    async fn test_static_credential_filters_blank() {
        assert_eq!(StaticCredential::new("a.b.c").load_credential().await.unwrap(), Some(Credential::new("a.b.c")));
        assert_eq!(StaticCredential::new("  ").load_credential().await.unwrap(), None);
        assert_eq!(StaticCredential::none().load_credential().await.unwrap(), None);
    }
}
