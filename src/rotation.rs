//! Token rotation: cadence decision and the validate-and-rotate pass.
//!
//! The rotation token is shared between the client credential and the
//! session record. It stays valid until the rotation window lapses; the
//! cadence, not strict one-shot use, is the anti-replay mechanism.

use anyhow::Result;
use tracing::debug;

use crate::cookie::CookieDirective;
use crate::guard::GuardConfig;
use crate::origin::RequestOrigin;
use crate::record::SessionRecord;
use crate::token::{ClientToken, generate_rotation_token};

/// A rotation that just happened.
#[derive(Clone, Debug)]
pub struct RotationEvent {
    /// Fresh token, already stored in the session record.
    pub token: String,
    /// Credential write carrying the token to the client.
    pub cookie: CookieDirective,
}

/// Decide whether the rotation window has lapsed.
///
/// An absent window is armed to `now + interval` and reports not due; a
/// lapsed window is re-armed and reports due. At most one rotation can fire
/// per interval.
pub fn is_rotation_due(record: &mut SessionRecord, now: i64, interval: i64) -> bool {
    let Some(token_time) = record.token_time else {
        record.token_time = Some(now + interval);
        return false;
    };

    if token_time - now < 0 {
        record.token_time = Some(now + interval);
        return true;
    }

    false
}

/// Validate the client token and rotate it if the window has lapsed.
///
/// Invoked only after the fingerprint check passed. A missing or mismatched
/// client token clears the session's auth state; a matching token inside the
/// window changes nothing. Rotation also fires when the session never had a
/// token bound to it.
pub fn validate_and_rotate(
    record: &mut SessionRecord,
    client_token: Option<&ClientToken>,
    origin: &RequestOrigin,
    now: i64,
    config: &GuardConfig,
) -> Result<Option<RotationEvent>> {
    let Some(client_token) = client_token else {
        debug!("client rotation token missing");
        record.clear_auth();
        return Ok(None);
    };

    if let Some(stored) = record.rotation_token.as_deref() {
        if !client_token.matches(stored) {
            debug!("client rotation token does not match session");
            record.clear_auth();
            return Ok(None);
        }
    }

    let never_issued = record.rotation_token.is_none();
    let due = is_rotation_due(record, now, config.rotation_interval_seconds());
    if !due && !never_issued {
        return Ok(None);
    }

    let token = generate_rotation_token()?;
    record.rotation_token = Some(token.clone());
    let cookie = CookieDirective::persistent(
        config.cookie_name(),
        &token,
        now + config.cookie_ttl_seconds(),
        &origin.hostname,
        config.cookie_secure(),
    );
    debug!("rotation token issued");

    Ok(Some(RotationEvent { token, cookie }))
}
