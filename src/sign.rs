use http::header;
use http::HeaderValue;
use log::debug;
use percent_encoding::utf8_percent_encode;

use crate::constants::{QUERY_ENCODE_SET, URI_ENCODE_SET, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN};
use crate::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use crate::request::SigningRequest;
use crate::time::{format_date, format_iso8601, now, DateTime};
use crate::{Credential, Result};

/// RequestSigner implements AWS SigV4 header signing.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// Double URI encoding is enabled by default: API Gateway decodes the request
/// path once before verifying the signature, so the canonical path must be
/// percent-encoded a second time. Omitting this is a classic source of
/// signature mismatches against `execute-api` endpoints. S3-style services
/// that verify against the single-encoded path can opt out via
/// [`with_double_uri_encode`](RequestSigner::with_double_uri_encode).
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,
    double_uri_encode: bool,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new SigV4 signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            double_uri_encode: true,

            time: None,
        }
    }

    /// Enable or disable double URI encoding of the canonical path.
    pub fn with_double_uri_encode(mut self, enable: bool) -> Self {
        self.double_uri_encode = enable;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign the request in place with the given credential.
    ///
    /// The signature covers the exact bytes of `body`; any mutation of body or
    /// headers afterwards invalidates it. No expiration check is performed
    /// here: an expired credential still yields a well-formed signature, and
    /// rejecting it is the server's business.
    pub fn sign_request(
        &self,
        req: &mut http::request::Parts,
        body: &[u8],
        cred: &Credential,
    ) -> Result<()> {
        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;
        let payload_hash = hex_sha256(body);

        // canonicalize context
        canonicalize_header(&mut signed_req, cred, now)?;
        canonicalize_query(&mut signed_req);

        // build canonical request and string to sign.
        let creq = canonical_request_string(&signed_req, &payload_hash, self.double_uri_encode)?;
        debug!("calculated canonical request: {creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/aws4_request",
            format_date(now),
            self.region,
            self.service
        );
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            format_iso8601(now),
            scope,
            encoded_req
        );
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id,
            scope,
            signed_req.header_name_to_vec_sorted().join(";"),
            signature
        ))?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)
    }
}

fn canonical_request_string(
    ctx: &SigningRequest,
    payload_hash: &str,
    double_uri_encode: bool,
) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    f.push_str(ctx.method.as_str());
    f.push('\n');
    // Insert canonical URI.
    //
    // The path arrives percent-encoded once (its wire form). Double encoding
    // percent-encodes it again, so an encoded reserved character like `%2F`
    // becomes `%252F` in the canonical request.
    if double_uri_encode {
        f.push_str(&utf8_percent_encode(&ctx.path, &URI_ENCODE_SET).to_string());
    } else {
        f.push_str(&ctx.path);
    }
    f.push('\n');
    // Insert query
    f.push_str(
        &ctx.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&"),
    );
    f.push('\n');
    // Insert signed headers
    let signed_headers = ctx.header_name_to_vec_sorted();
    for name in signed_headers.iter() {
        f.push_str(name);
        f.push(':');
        f.push_str(ctx.headers[*name].to_str()?);
        f.push('\n');
    }
    f.push('\n');
    f.push_str(&signed_headers.join(";"));
    f.push('\n');
    f.push_str(payload_hash);

    Ok(f)
}

fn canonicalize_header(ctx: &mut SigningRequest, cred: &Credential, now: DateTime) -> Result<()> {
    // Header names and values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in ctx.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Insert HOST header if not present.
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers
            .insert(header::HOST, ctx.authority.as_str().parse()?);
    }

    // Insert DATE header if not present.
    if ctx.headers.get(X_AMZ_DATE).is_none() {
        let date_header = HeaderValue::try_from(format_iso8601(now))?;
        ctx.headers.insert(X_AMZ_DATE, date_header);
    }

    // Insert X_AMZ_SECURITY_TOKEN header if session token exists.
    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to avoid leaking.
        value.set_sensitive(true);

        ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}

fn canonicalize_query(ctx: &mut SigningRequest) {
    if ctx.query.is_empty() {
        return;
    }

    // Sort by param name
    ctx.query.sort();

    ctx.query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}
