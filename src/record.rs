//! Session record shared with the session store.
//!
//! The store owns the record; this crate only reads and mutates the auth,
//! rotation-token, and window fields of one record per active session. The
//! record itself never reaches the client.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::origin::RequestOrigin;

/// Fingerprint frozen at authentication time, plus the sliding deadline.
///
/// All five origin fields are required: a stored mapping missing any of them
/// is untrusted and decodes to no fingerprint at all. Only `expire_time` may
/// be absent, until the expiration tracker initializes it on first use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRecord {
    pub user_agent: String,
    pub hostname: String,
    pub http_host: String,
    pub server_software: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
}

impl AuthRecord {
    /// Freeze the current request origin for a newly authenticated session.
    ///
    /// Called by the external authentication step once identity is proven.
    #[must_use]
    pub fn from_origin(origin: &RequestOrigin, expire_time: Option<i64>) -> Self {
        Self {
            user_agent: origin.user_agent.clone(),
            hostname: origin.hostname.clone(),
            http_host: origin.http_host.clone(),
            server_software: origin.server_software.clone(),
            port: origin.port,
            expire_time,
        }
    }
}

/// One session's server-side state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Authenticated state; `None` means the session is not trusted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthRecord>,
    /// Last rotation token issued to the client, raw. Server-side only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_token: Option<String>,
    /// Unix timestamp at which the next rotation becomes due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_time: Option<i64>,
}

impl SessionRecord {
    /// Decode a stored value, dropping anything malformed.
    ///
    /// A partially populated or non-mapping `auth` entry decodes to `None`
    /// rather than failing the record: ambiguous data resolves to
    /// "not authenticated".
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let auth = value
            .get("auth")
            .and_then(|raw| serde_json::from_value(raw.clone()).ok());
        let rotation_token = value
            .get("rotation_token")
            .and_then(Value::as_str)
            .map(str::to_string);
        let token_time = value.get("token_time").and_then(Value::as_i64);
        Self {
            auth,
            rotation_token,
            token_time,
        }
    }

    /// Encode the record for the store.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).context("failed to serialize session record")
    }

    /// Whether the session currently carries authenticated state.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Drop the authenticated state. Every failed check funnels through here.
    pub fn clear_auth(&mut self) {
        if self.auth.take().is_some() {
            debug!("session auth cleared");
        }
    }
}
