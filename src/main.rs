//! Demonstration workflow: resolve credentials, assume a role via STS, sign
//! an API Gateway request with SigV4 and invoke it.
//!
//! Configuration comes from the environment, see [`Config`]. Exit code is 1
//! when configuration, credential resolution or role assumption fails;
//! failures of the signed call itself are logged and the process exits 0.

use bytes::Bytes;
use log::{error, info, warn};

use gateway_invoke::{
    invoke, AssumeRoleCredentialProvider, Config, Context, DefaultCredentialProvider, Error,
    OsEnv, ProvideCredential, ReqwestHttpSend, RequestSigner, Signer, StaticCredentialProvider,
    TokioFileRead,
};

#[tokio::main]
async fn main() {
    env_logger::init();

    // Everything that holds the HTTP client lives inside run, so the
    // connection pool is released before the process exits, on every path.
    let code = run().await;
    std::process::exit(code);
}

async fn run() -> i32 {
    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let config = Config::default().from_env(&ctx);
    let (url, role_arn) = match (config.url(), config.role_arn()) {
        (Ok(url), Ok(role_arn)) => (url.to_string(), role_arn.to_string()),
        (Err(e), _) | (_, Err(e)) => {
            error!("{e}");
            return 1;
        }
    };

    // Step 1: resolve base credentials through the default chain.
    let provider = DefaultCredentialProvider::new();
    let base = match provider.provide_credential(&ctx).await {
        Ok(Some(cred)) => cred,
        Ok(None) => {
            error!("no credential source yielded base credentials");
            return 1;
        }
        Err(e) => {
            log_error_chain(&e);
            return 1;
        }
    };
    info!("resolved base credential: {base:?}");

    // Step 2: exchange them for session credentials.
    let sts_signer = Signer::new(
        ctx.clone(),
        StaticCredentialProvider::from(&base),
        RequestSigner::new("sts", &config.region),
    );
    let assume_role = AssumeRoleCredentialProvider::new(role_arn.clone(), sts_signer)
        .with_role_session_name(config.role_session_name.clone())
        .with_region(config.region.clone());

    let session = match assume_role.provide_credential(&ctx).await {
        Ok(Some(cred)) => cred,
        Ok(None) => {
            error!("assume role for {role_arn} returned no credentials");
            return 1;
        }
        Err(e) => {
            log_error_chain(&e);
            return 1;
        }
    };
    info!("assumed role {role_arn}: {session:?}");
    if let Some(expires_at) = session.expires_at {
        info!("session credentials expire at {expires_at}");
    }

    // Step 3 and 4: sign the request and invoke the endpoint. From here on
    // failures are logged but no longer change the exit code.
    let body = Bytes::from(
        config
            .body
            .clone()
            .unwrap_or_else(|| r#"{"string": "hello"}"#.to_string()),
    );

    let req = match http::Request::builder()
        .method(http::Method::POST)
        .uri(url.as_str())
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(())
    {
        Ok(req) => req,
        Err(e) => {
            log_error_chain(&Error::signing(format!("invalid request for {url}")).with_source(e));
            return 0;
        }
    };
    info!("signing {} {}", req.method(), req.uri());

    let api_signer = Signer::new(
        ctx.clone(),
        StaticCredentialProvider::from(&session),
        RequestSigner::new(&config.service, &config.region),
    );

    let (mut parts, _) = req.into_parts();
    if let Err(e) = api_signer.sign(&mut parts, &body).await {
        log_error_chain(&e);
        return 0;
    }
    for (name, value) in parts.headers.iter() {
        // Sensitive values (Authorization, the session token) print redacted.
        info!("signed header {name}: {value:?}");
    }

    match invoke(&ctx, http::Request::from_parts(parts, body)).await {
        Ok(result) => {
            if !result.is_success() {
                warn!("endpoint answered {} {}", result.status, result.status_text());
            }
            println!("{}", result.status.as_u16());
            println!("{}", result.status_text());
            println!("{}", result.body_string());
            0
        }
        Err(e) => {
            log_error_chain(&e);
            0
        }
    }
}

fn log_error_chain(e: &Error) {
    error!("{e}");
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        error!("caused by: {cause}");
        source = cause.source();
    }
}
