//! Where access credentials come from.
//!
//! Logging in to an identity provider is out of scope here; whatever flow
//! the host application uses, it ends with an [`AccessCredential`]. The
//! [`CredentialProvider`] trait is the seam between that flow and the
//! handshake.

use trailhead_protocol::AccessCredential;

use crate::SessionError;

/// Produces the access credential for the next handshake.
///
/// # Example
///
/// ```rust
/// use trailhead_protocol::{AccessCredential, AuthKind};
/// use trailhead_session::{CredentialProvider, SessionError};
///
/// /// Reads the token from an environment variable on every handshake.
/// struct FromEnv;
///
/// impl CredentialProvider for FromEnv {
///     async fn credential(&self) -> Result<AccessCredential, SessionError> {
///         let token = std::env::var("TRAILHEAD_TOKEN")
///             .map_err(|e| SessionError::Credential(e.to_string()))?;
///         Ok(AccessCredential::new(token, AuthKind::Ptc))
///     }
/// }
/// ```
pub trait CredentialProvider: Send + Sync {
    fn credential(
        &self,
    ) -> impl std::future::Future<Output = Result<AccessCredential, SessionError>> + Send;
}

/// A credential obtained up front.
#[derive(Debug, Clone)]
pub struct StaticCredential(pub AccessCredential);

impl CredentialProvider for StaticCredential {
    async fn credential(&self) -> Result<AccessCredential, SessionError> {
        if self.0.token.is_empty() {
            return Err(SessionError::Credential("empty access token".into()));
        }
        Ok(self.0.clone())
    }
}
