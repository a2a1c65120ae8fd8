// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::time::{now, DateTime};
use crate::utils::Redact;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access_key and secret_key.
///
/// A credential is immutable once obtained. Session credentials obtained via
/// role assumption carry an expiration instant and must be re-obtained after
/// it passes.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for aws services.
    pub access_key_id: String,
    /// Secret access key for aws services.
    pub secret_access_key: String,
    /// Session token, present for temporary credentials.
    pub session_token: Option<String>,
    /// Expiration time for this credential.
    pub expires_at: Option<DateTime>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Credential {
    /// Check if the credential is still usable for signing.
    ///
    /// Note that the signer itself never checks expiration; this is only used
    /// by [`Signer`](crate::Signer) to decide whether a cached credential
    /// should be reloaded.
    pub fn is_valid(&self) -> bool {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return false;
        }
        // Take 120s as buffer to avoid edge cases.
        if let Some(valid) = self
            .expires_at
            .map(|v| v > now() + chrono::TimeDelta::try_minutes(2).expect("in bounds"))
        {
            return valid;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn base_credential() -> Credential {
        Credential {
            access_key_id: "access_key_id".to_string(),
            secret_access_key: "secret_access_key".to_string(),
            session_token: None,
            expires_at: None,
        }
    }

    #[test]
    fn test_static_credential_is_valid() {
        assert!(base_credential().is_valid());
    }

    #[test]
    fn test_empty_credential_is_invalid() {
        assert!(!Credential::default().is_valid());

        let mut cred = base_credential();
        cred.secret_access_key = String::new();
        assert!(!cred.is_valid());
    }

    #[test]
    fn test_expired_credential_is_invalid() {
        let mut cred = base_credential();
        cred.expires_at = Some(now() - TimeDelta::try_minutes(1).unwrap());
        assert!(!cred.is_valid());

        // Credentials within the expiry buffer count as invalid too.
        cred.expires_at = Some(now() + TimeDelta::try_seconds(30).unwrap());
        assert!(!cred.is_valid());
    }

    #[test]
    fn test_fresh_credential_is_valid() {
        let mut cred = base_credential();
        cred.expires_at = Some(now() + TimeDelta::try_hours(1).unwrap());
        assert!(cred.is_valid());
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let cred = Credential {
            access_key_id: "AKIDEXAMPLEKEYID".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG/bPxRfiCY".to_string(),
            session_token: Some("short".to_string()),
            expires_at: None,
        };

        let out = format!("{cred:?}");
        assert!(!out.contains("EXAMPLEKEYID"));
        assert!(!out.contains("K7MDENG"));
        assert!(out.contains("AKI***"));
    }
}
