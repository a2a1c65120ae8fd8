use bytes::Bytes;
use http::StatusCode;
use log::debug;

use crate::{Context, Result};

/// The outcome of executing a signed request.
///
/// A non-2xx status is deliberately not an error: the signature workflow
/// completed and the status is the endpoint's answer. Callers that care
/// should check [`is_success`](InvocationResult::is_success) themselves.
#[derive(Debug)]
pub struct InvocationResult {
    /// HTTP status code returned by the endpoint.
    pub status: StatusCode,
    /// The full response body.
    pub body: Bytes,
}

impl InvocationResult {
    /// The canonical reason phrase for the status, e.g. "OK".
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Whether the endpoint answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The response body decoded as UTF-8, lossily.
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// Execute a signed request and collect the response.
///
/// The request goes out exactly as given; altering it here would break the
/// signature. Connection failures surface as transport errors, responses of
/// any status are returned as results.
pub async fn invoke(ctx: &Context, req: http::Request<Bytes>) -> Result<InvocationResult> {
    debug!(
        "invoking {} {} with {} body bytes",
        req.method(),
        req.uri(),
        req.body().len()
    );

    let resp = ctx.http_send(req).await?;
    let (parts, body) = resp.into_parts();

    Ok(InvocationResult {
        status: parts.status,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, HttpSend};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct EchoHttpSend {
        status: StatusCode,
    }

    #[async_trait]
    impl HttpSend for EchoHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            Ok(http::Response::builder()
                .status(self.status)
                .body(req.into_body())
                .expect("response must build"))
        }
    }

    fn post_request(body: &'static str) -> http::Request<Bytes> {
        http::Request::builder()
            .method(http::Method::POST)
            .uri("https://example.execute-api.us-west-2.amazonaws.com/prod/echo")
            .body(Bytes::from_static(body.as_bytes()))
            .expect("request must build")
    }

    #[tokio::test]
    async fn test_invoke_returns_status_and_body() -> Result<()> {
        let ctx = Context::new().with_http_send(EchoHttpSend {
            status: StatusCode::OK,
        });

        let result = invoke(&ctx, post_request(r#"{"string":"hello"}"#)).await?;
        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(result.status_text(), "OK");
        assert!(result.is_success());
        assert_eq!(result.body_string(), r#"{"string":"hello"}"#);

        Ok(())
    }

    /// A non-2xx answer is a result, not an error.
    #[tokio::test]
    async fn test_invoke_passes_through_failure_status() -> Result<()> {
        let ctx = Context::new().with_http_send(EchoHttpSend {
            status: StatusCode::FORBIDDEN,
        });

        let result = invoke(&ctx, post_request(r#"{"message":"Forbidden"}"#)).await?;
        assert_eq!(result.status, StatusCode::FORBIDDEN);
        assert!(!result.is_success());

        Ok(())
    }

    #[tokio::test]
    async fn test_invoke_surfaces_transport_errors() {
        // The default context has no HTTP client configured.
        let ctx = Context::new();

        let err = invoke(&ctx, post_request("{}")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
