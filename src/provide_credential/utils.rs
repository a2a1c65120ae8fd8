use http::StatusCode;
use serde::Deserialize;

use crate::{Error, Result};

/// Get the sts endpoint.
///
/// The returning format may look like `sts.{region}.amazonaws.com`
///
/// # Notes
///
/// AWS could have different sts endpoint based on it's region.
/// We can check them by region name.
pub fn sts_endpoint(region: Option<&str>, use_regional: bool) -> Result<String> {
    if use_regional {
        let region = region
            .ok_or_else(|| Error::config_invalid("regional STS endpoint requires a region"))?;
        if region.starts_with("cn-") {
            Ok(format!("sts.{region}.amazonaws.com.cn"))
        } else {
            Ok(format!("sts.{region}.amazonaws.com"))
        }
    } else {
        let region = region.unwrap_or_default();
        if region.starts_with("cn-") {
            Ok("sts.amazonaws.com.cn".to_string())
        } else {
            Ok("sts.amazonaws.com".to_string())
        }
    }
}

/// Turn a non-200 STS response into a role assumption error carrying the
/// service's code and message.
pub fn parse_sts_error(operation: &str, status: StatusCode, body: &str) -> Error {
    match quick_xml::de::from_str::<StsErrorResponse>(body) {
        Ok(resp) => Error::role_assumption(format!(
            "STS {operation} failed with status {status}: [{}] {}",
            resp.error.code, resp.error.message
        )),
        // Not the documented XML shape, keep the raw body for diagnosis.
        Err(_) => Error::role_assumption(format!(
            "STS {operation} failed with status {status}: {body}"
        )),
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StsErrorResponse {
    error: StsError,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StsError {
    code: String,
    message: String,
}
