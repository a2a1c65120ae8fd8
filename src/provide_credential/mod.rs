//! Credential providers and the chain that composes them.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{Context, Credential, Result};

/// ProvideCredential is the interface every credential source implements.
///
/// Returning `Ok(None)` means "this source has nothing to offer, try the
/// next one"; returning an error means the source was expected to work but
/// could not.
#[async_trait]
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Load a credential from this source.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Credential>>;
}

mod chain;
pub use chain::ProvideCredentialChain;

mod env;
pub use env::EnvCredentialProvider;

mod profile;
pub use profile::ProfileCredentialProvider;

mod imds;
pub use imds::IMDSv2CredentialProvider;

mod static_provider;
pub use static_provider::StaticCredentialProvider;

mod default;
pub use default::DefaultCredentialProvider;

mod assume_role;
pub use assume_role::AssumeRoleCredentialProvider;

mod utils;
