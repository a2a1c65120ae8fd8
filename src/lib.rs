//! Sign and invoke AWS API Gateway requests.
//!
//! This crate implements the full workflow of calling an IAM-protected API
//! Gateway endpoint:
//!
//! 1. resolve base credentials through a provider chain
//!    ([`DefaultCredentialProvider`]: environment, shared profile files,
//!    EC2 instance metadata),
//! 2. exchange them for temporary session credentials via STS AssumeRole
//!    ([`AssumeRoleCredentialProvider`]),
//! 3. sign the request with AWS Signature Version 4 ([`RequestSigner`],
//!    with the double URI encoding API Gateway requires),
//! 4. execute it and collect the response ([`invoke`]).
//!
//! All environment access, file reading and HTTP sending goes through a
//! [`Context`], so every step can be exercised against static environments
//! and mock transports.
//!
//! ## Example
//!
//! ```no_run
//! use gateway_invoke::{
//!     invoke, Context, DefaultCredentialProvider, OsEnv, ReqwestHttpSend, RequestSigner, Signer,
//!     TokioFileRead,
//! };
//!
//! # async fn example() -> gateway_invoke::Result<()> {
//! let ctx = Context::new()
//!     .with_file_read(TokioFileRead)
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! let signer = Signer::new(
//!     ctx.clone(),
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::new("execute-api", "us-west-2"),
//! );
//!
//! let body = bytes::Bytes::from_static(br#"{"string": "hello"}"#);
//! let req = http::Request::builder()
//!     .method(http::Method::POST)
//!     .uri("https://example.execute-api.us-west-2.amazonaws.com/prod/echo")
//!     .header(http::header::CONTENT_TYPE, "application/json")
//!     .body(())
//!     .unwrap();
//!
//! let (mut parts, _) = req.into_parts();
//! signer.sign(&mut parts, &body).await?;
//!
//! let resp = invoke(&ctx, http::Request::from_parts(parts, body)).await?;
//! println!("{} {}", resp.status, resp.status_text());
//! # Ok(())
//! # }
//! ```

mod constants;

mod context;
pub use context::{
    Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, ReqwestHttpSend,
    StaticEnv, TokioFileRead,
};

mod error;
pub use error::{Error, ErrorKind, Result};

pub mod hash;
pub mod time;
pub mod utils;

mod credential;
pub use credential::Credential;

mod request;
pub use request::SigningRequest;

pub mod provide_credential;
pub use provide_credential::{
    AssumeRoleCredentialProvider, DefaultCredentialProvider, EnvCredentialProvider,
    IMDSv2CredentialProvider, ProfileCredentialProvider, ProvideCredential,
    ProvideCredentialChain, StaticCredentialProvider,
};

mod sign;
pub use sign::RequestSigner;

mod signer;
pub use signer::Signer;

mod invoke;
pub use invoke::{invoke, InvocationResult};

mod config;
pub use config::Config;
