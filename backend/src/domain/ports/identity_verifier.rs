//! Driven port for the external identity provider.
//!
//! Credential checks happen outside this service; the provider only hands
//! back a stable user id for a token it accepts.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::UserId;

define_port_error! {
    /// Errors raised while verifying identity tokens.
    pub enum IdentityVerificationError {
        Rejected { message: String } => "identity token rejected: {message}",
        Unavailable { message: String } => "identity provider unavailable: {message}",
    }
}

/// Resolves identity tokens to user ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `token` and return the user it identifies.
    async fn verify(&self, token: &str) -> Result<UserId, IdentityVerificationError>;
}

/// Prefix accepted by [`FixtureIdentityVerifier`].
pub const FIXTURE_TOKEN_PREFIX: &str = "dev-token:";

/// Development verifier accepting tokens of the form `dev-token:<uuid>`.
///
/// Used when no identity provider is wired and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIdentityVerifier;

#[async_trait]
impl IdentityVerifier for FixtureIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, IdentityVerificationError> {
        let raw = token
            .strip_prefix(FIXTURE_TOKEN_PREFIX)
            .ok_or_else(|| IdentityVerificationError::rejected("unrecognised token format"))?;
        UserId::new(raw).map_err(|err| IdentityVerificationError::rejected(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_accepts_prefixed_uuids() {
        let user = UserId::random();
        let verified = FixtureIdentityVerifier
            .verify(&format!("{FIXTURE_TOKEN_PREFIX}{user}"))
            .await
            .expect("token accepted");
        assert_eq!(verified, user);
    }

    #[rstest]
    #[case("")]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[case("dev-token:not-a-uuid")]
    #[tokio::test]
    async fn fixture_rejects_other_tokens(#[case] token: &str) {
        let result = FixtureIdentityVerifier.verify(token).await;
        assert!(matches!(result, Err(IdentityVerificationError::Rejected { .. })));
    }
}
