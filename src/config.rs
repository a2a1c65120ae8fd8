use crate::constants::*;
use crate::{Context, Error, Result};

/// Config carries the settings of the demo workflow.
#[derive(Clone, Debug)]
pub struct Config {
    /// `url` is the API Gateway endpoint to invoke. Loaded from
    /// [`GATEWAY_INVOKE_URL`] if unset.
    pub url: Option<String>,
    /// `role_arn` is the role to assume before signing. Loaded from
    /// [`GATEWAY_INVOKE_ROLE_ARN`] if unset.
    pub role_arn: Option<String>,
    /// `role_session_name` names the assumed-role session. Loaded from
    /// [`GATEWAY_INVOKE_SESSION_NAME`], defaults to `gateway-invoke`.
    pub role_session_name: String,
    /// `region` used for both STS and request signing. Loaded from
    /// [`GATEWAY_INVOKE_REGION`], then [`AWS_REGION`], defaults to
    /// `us-west-2`.
    pub region: String,
    /// `service` is the signing name of the target. Loaded from
    /// [`GATEWAY_INVOKE_SERVICE`], defaults to `execute-api`.
    pub service: String,
    /// `body` is the JSON payload to send. Loaded from
    /// [`GATEWAY_INVOKE_BODY`] if unset.
    pub body: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            role_arn: None,
            role_session_name: "gateway-invoke".to_string(),
            region: "us-west-2".to_string(),
            service: "execute-api".to_string(),
            body: None,
        }
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(GATEWAY_INVOKE_URL) {
            self.url.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(GATEWAY_INVOKE_ROLE_ARN) {
            self.role_arn.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(GATEWAY_INVOKE_SESSION_NAME) {
            self.role_session_name = v;
        }
        if let Some(v) = ctx
            .env_var(GATEWAY_INVOKE_REGION)
            .or_else(|| ctx.env_var(AWS_REGION))
        {
            self.region = v;
        }
        if let Some(v) = ctx.env_var(GATEWAY_INVOKE_SERVICE) {
            self.service = v;
        }
        if let Some(v) = ctx.env_var(GATEWAY_INVOKE_BODY) {
            self.body.get_or_insert(v);
        }

        self
    }

    /// The endpoint URL, or a config error naming the missing variable.
    pub fn url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| Error::config_invalid(format!("{GATEWAY_INVOKE_URL} is not set")))
    }

    /// The role ARN, or a config error naming the missing variable.
    pub fn role_arn(&self) -> Result<&str> {
        self.role_arn
            .as_deref()
            .ok_or_else(|| Error::config_invalid(format!("{GATEWAY_INVOKE_ROLE_ARN} is not set")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    #[test]
    fn test_config_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (
                    GATEWAY_INVOKE_URL.to_string(),
                    "https://example.execute-api.us-west-2.amazonaws.com/prod/echo".to_string(),
                ),
                (
                    GATEWAY_INVOKE_ROLE_ARN.to_string(),
                    "arn:aws:iam::111111111111:role/demo".to_string(),
                ),
                (
                    GATEWAY_INVOKE_SESSION_NAME.to_string(),
                    "test-session-1".to_string(),
                ),
                (AWS_REGION.to_string(), "eu-central-1".to_string()),
            ]),
        });

        let config = Config::default().from_env(&ctx);
        assert_eq!(
            config.url().unwrap(),
            "https://example.execute-api.us-west-2.amazonaws.com/prod/echo"
        );
        assert_eq!(
            config.role_arn().unwrap(),
            "arn:aws:iam::111111111111:role/demo"
        );
        assert_eq!(config.role_session_name, "test-session-1");
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.service, "execute-api");
        assert!(config.body.is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default().from_env(&Context::new());

        assert_eq!(config.role_session_name, "gateway-invoke");
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.service, "execute-api");

        let err = config.url().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(
            config.role_arn().unwrap_err().kind(),
            ErrorKind::ConfigInvalid
        );
    }
}
