//! Request origin fingerprint and its validator.
//!
//! A session is bound to the environment that created it: user agent,
//! hostname, HTTP host, server software, and listening port. Any drift is
//! treated as a potential hijack and forces re-authentication.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{AuthRecord, SessionRecord};

/// Snapshot of the attributes the current request arrived with.
///
/// Built by the embedding server from its request metadata. Ephemeral; never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOrigin {
    pub user_agent: String,
    pub hostname: String,
    pub http_host: String,
    pub server_software: String,
    pub port: u16,
}

/// Outcome of a fingerprint check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationResult {
    /// Fingerprint matches; the token check may proceed.
    Ok,
    /// Session auth state was cleared.
    Invalidated,
}

/// Compare the frozen fingerprint against the current request.
///
/// A missing or incomplete fingerprint, or the first mismatching field,
/// clears the session's auth state; later fields are not inspected. Matching
/// on all five fields has no side effect.
pub fn validate_origin(record: &mut SessionRecord, origin: &RequestOrigin) -> ValidationResult {
    let mismatch = match record.auth.as_ref() {
        None => Some("auth"),
        Some(auth) => mismatched_field(auth, origin),
    };

    match mismatch {
        None => ValidationResult::Ok,
        Some(field) => {
            debug!(field, "request origin does not match session fingerprint");
            record.clear_auth();
            ValidationResult::Invalidated
        }
    }
}

/// First fingerprint field that differs from the request, comparison order
/// fixed: user agent, hostname, HTTP host, server software, port.
fn mismatched_field(auth: &AuthRecord, origin: &RequestOrigin) -> Option<&'static str> {
    if auth.user_agent != origin.user_agent {
        return Some("user_agent");
    }
    if auth.hostname != origin.hostname {
        return Some("hostname");
    }
    if auth.http_host != origin.http_host {
        return Some("http_host");
    }
    if auth.server_software != origin.server_software {
        return Some("server_software");
    }
    if auth.port != origin.port {
        return Some("port");
    }
    None
}
