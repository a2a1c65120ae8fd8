use std::sync::{Arc, Mutex};

use crate::provide_credential::ProvideCredential;
use crate::sign::RequestSigner;
use crate::{Context, Credential, Error, Result};

/// Signer ties a credential provider to a [`RequestSigner`].
///
/// The resolved credential is cached and reused until it stops being valid
/// (missing, or within the expiry buffer), at which point the provider is
/// asked again.
#[derive(Clone, Debug)]
pub struct Signer {
    ctx: Context,
    provider: Arc<dyn ProvideCredential>,
    request_signer: Arc<RequestSigner>,
    credential: Arc<Mutex<Option<Credential>>>,
}

impl Signer {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential,
        request_signer: RequestSigner,
    ) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            request_signer: Arc::new(request_signer),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Sign the request in place, resolving a credential first if needed.
    ///
    /// Fails with a `CredentialsUnavailable` error when the provider cannot
    /// produce any credential.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        let cred = match cached {
            Some(cred) if cred.is_valid() => cred,
            _ => {
                let cred = self
                    .provider
                    .provide_credential(&self.ctx)
                    .await?
                    .ok_or_else(|| {
                        Error::credentials_unavailable(
                            "no credential source in the chain yielded a credential",
                        )
                    })?;
                *self.credential.lock().expect("lock poisoned") = Some(cred.clone());
                cred
            }
        };

        self.request_signer.sign_request(req, body, &cred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provide_credential::StaticCredentialProvider;
    use crate::ErrorKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProvideCredential for CountingProvider {
        async fn provide_credential(&self, _: &Context) -> Result<Option<Credential>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Credential {
                access_key_id: "access_key_id".to_string(),
                secret_access_key: "secret_access_key".to_string(),
                session_token: None,
                expires_at: None,
            }))
        }
    }

    #[derive(Debug)]
    struct EmptyProvider;

    #[async_trait]
    impl ProvideCredential for EmptyProvider {
        async fn provide_credential(&self, _: &Context) -> Result<Option<Credential>> {
            Ok(None)
        }
    }

    fn parts() -> http::request::Parts {
        http::Request::builder()
            .method(http::Method::GET)
            .uri("https://example.com/")
            .body(())
            .expect("request must build")
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_credential_is_cached_between_signs() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            CountingProvider {
                calls: calls.clone(),
            },
            RequestSigner::new("execute-api", "us-west-2"),
        );

        let mut first = parts();
        signer.sign(&mut first, b"").await?;
        let mut second = parts();
        signer.sign(&mut second, b"").await?;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(first.headers.contains_key(http::header::AUTHORIZATION));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_credential_surfaces_as_error() {
        let signer = Signer::new(
            Context::new(),
            EmptyProvider,
            RequestSigner::new("execute-api", "us-west-2"),
        );

        let mut req = parts();
        let err = signer.sign(&mut req, b"").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialsUnavailable);
    }

    #[tokio::test]
    async fn test_static_provider_signs() -> Result<()> {
        let signer = Signer::new(
            Context::new(),
            StaticCredentialProvider::new("ak", "sk").with_session_token("token"),
            RequestSigner::new("execute-api", "us-west-2"),
        );

        let mut req = parts();
        signer.sign(&mut req, b"{}").await?;
        assert!(req.headers.contains_key("x-amz-security-token"));

        Ok(())
    }
}
