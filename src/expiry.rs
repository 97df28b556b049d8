//! Sliding expiration: touch-to-extend deadline tracking.

use tracing::debug;

use crate::cookie::CookieDirective;
use crate::guard::GuardConfig;
use crate::record::SessionRecord;

/// Offset applied to the credential expiry when deleting it.
const DELETE_BACKDATE_SECONDS: i64 = 60 * 60 * 30;

/// Extend the session deadline while it is still live, clear it otherwise.
///
/// Every validated request pushes the deadline forward by the configured
/// lifetime, but only while the previously stored deadline has not itself
/// lapsed. The deadline never moves backward. Once the window lapses the
/// auth state is cleared and the returned directive tells the transport to
/// delete the client's rotation credential. Runs independently of the
/// fingerprint and token checks; a record without auth state is a no-op.
pub fn validate_time(
    record: &mut SessionRecord,
    now: i64,
    config: &GuardConfig,
) -> Option<CookieDirective> {
    let deadline = now + config.session_lifetime_seconds();

    let auth = record.auth.as_mut()?;
    let expire_time = *auth.expire_time.get_or_insert(deadline);

    let elapsed = deadline - expire_time;
    let remaining = (deadline - now) - elapsed;

    if remaining > 0 {
        auth.expire_time = Some(deadline);
        return None;
    }

    debug!("session expiration window lapsed");
    record.clear_auth();
    Some(CookieDirective::delete(
        config.cookie_name(),
        now - DELETE_BACKDATE_SECONDS,
    ))
}
