//! Guard configuration and the per-request validation pass.

use anyhow::Result;

use crate::cookie::CookieDirective;
use crate::expiry::validate_time;
use crate::origin::{RequestOrigin, ValidationResult, validate_origin};
use crate::record::SessionRecord;
use crate::rotation::validate_and_rotate;
use crate::token::ClientToken;

const DEFAULT_SESSION_LIFETIME_SECONDS: i64 = 3600;
const DEFAULT_ROTATION_INTERVAL_SECONDS: i64 = 60;
const DEFAULT_COOKIE_TTL_SECONDS: i64 = 60 * 60 * 24 * 30 * 6;
const DEFAULT_COOKIE_NAME: &str = "__auth__";

/// Response header announcing that the rotation token changed.
pub const ROTATION_SIGNAL_HEADER: &str = "x-sentinela-rotation";

/// Tunables supplied by the embedding service's configuration layer.
#[derive(Clone, Debug)]
pub struct GuardConfig {
    session_lifetime_seconds: i64,
    rotation_interval_seconds: i64,
    cookie_ttl_seconds: i64,
    cookie_name: String,
    production: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_lifetime_seconds: DEFAULT_SESSION_LIFETIME_SECONDS,
            rotation_interval_seconds: DEFAULT_ROTATION_INTERVAL_SECONDS,
            cookie_ttl_seconds: DEFAULT_COOKIE_TTL_SECONDS,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            production: false,
        }
    }

    #[must_use]
    pub fn with_session_lifetime_seconds(mut self, seconds: i64) -> Self {
        self.session_lifetime_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_rotation_interval_seconds(mut self, seconds: i64) -> Self {
        self.rotation_interval_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_ttl_seconds(mut self, seconds: i64) -> Self {
        self.cookie_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_name(mut self, name: String) -> Self {
        self.cookie_name = name;
        self
    }

    #[must_use]
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    #[must_use]
    pub fn session_lifetime_seconds(&self) -> i64 {
        self.session_lifetime_seconds
    }

    #[must_use]
    pub fn rotation_interval_seconds(&self) -> i64 {
        self.rotation_interval_seconds
    }

    #[must_use]
    pub fn cookie_ttl_seconds(&self) -> i64 {
        self.cookie_ttl_seconds
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// `Secure` goes on the credential only when running in production.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.production
    }
}

/// Session status after a validation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Fingerprint, token, and window all held; the session stays trusted.
    Active,
    /// Some check failed and the auth state was cleared.
    Invalidated,
}

/// Rotation announcement for the response side channel.
///
/// Consumed by observability and tests; not required for correctness.
#[derive(Clone, Debug)]
pub struct RotationSignal {
    token: String,
}

impl RotationSignal {
    /// The freshly issued token value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Header pair for response metadata.
    #[must_use]
    pub fn header(&self) -> (&'static str, &str) {
        (ROTATION_SIGNAL_HEADER, &self.token)
    }
}

/// Everything a validation pass wants applied outside the session record.
#[derive(Debug)]
pub struct Outcome {
    pub status: SessionStatus,
    /// Credential writes for the transport collaborator, in order.
    pub cookies: Vec<CookieDirective>,
    /// Present when a rotation happened during this pass.
    pub rotation: Option<RotationSignal>,
}

/// Per-request validator bound to an explicit configuration.
///
/// One instance serves any number of sessions; all mutable state lives in
/// the session record passed to [`SessionGuard::validate`]. Callers must
/// hold the store's per-session serialization (see
/// [`SessionStore`](crate::SessionStore)) across the whole pass.
#[derive(Clone, Debug, Default)]
pub struct SessionGuard {
    config: GuardConfig,
}

impl SessionGuard {
    #[must_use]
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Run one validation pass over a session record.
    ///
    /// The sliding window is settled first, then the origin fingerprint,
    /// then the rotation token. Every protocol failure clears the record's
    /// auth state and reports [`SessionStatus::Invalidated`]; none is an
    /// error. `Err` is reserved for collaborator faults such as an
    /// unavailable random source, which abort the request.
    pub fn validate(
        &self,
        record: &mut SessionRecord,
        origin: &RequestOrigin,
        client_token: Option<&ClientToken>,
        now: i64,
    ) -> Result<Outcome> {
        let mut cookies = Vec::new();

        if let Some(delete) = validate_time(record, now, &self.config) {
            cookies.push(delete);
            return Ok(Outcome {
                status: SessionStatus::Invalidated,
                cookies,
                rotation: None,
            });
        }

        if validate_origin(record, origin) == ValidationResult::Invalidated {
            return Ok(Outcome {
                status: SessionStatus::Invalidated,
                cookies,
                rotation: None,
            });
        }

        let rotation = validate_and_rotate(record, client_token, origin, now, &self.config)?
            .map(|event| {
                cookies.push(event.cookie);
                RotationSignal { token: event.token }
            });

        let status = if record.is_authenticated() {
            SessionStatus::Active
        } else {
            SessionStatus::Invalidated
        };

        Ok(Outcome {
            status,
            cookies,
            rotation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        GuardConfig, ROTATION_SIGNAL_HEADER, RotationSignal, SessionGuard, SessionStatus,
    };
    use crate::origin::RequestOrigin;
    use crate::record::{AuthRecord, SessionRecord};
    use crate::token::ClientToken;
    use anyhow::Result;

    const NOW: i64 = 1_700_000_000;

    fn origin() -> RequestOrigin {
        RequestOrigin {
            user_agent: "UA1".to_string(),
            hostname: "h".to_string(),
            http_host: "h:443".to_string(),
            server_software: "srv".to_string(),
            port: 443,
        }
    }

    fn bound_record() -> SessionRecord {
        SessionRecord {
            auth: Some(AuthRecord::from_origin(&origin(), Some(NOW + 3600))),
            rotation_token: Some("token".to_string()),
            token_time: Some(NOW + 60),
        }
    }

    #[test]
    fn guard_config_defaults_and_overrides() {
        let config = GuardConfig::new();
        assert_eq!(config.session_lifetime_seconds(), 3600);
        assert_eq!(config.rotation_interval_seconds(), 60);
        assert_eq!(config.cookie_ttl_seconds(), 60 * 60 * 24 * 30 * 6);
        assert_eq!(config.cookie_name(), "__auth__");
        assert!(!config.cookie_secure());

        let config = config
            .with_session_lifetime_seconds(120)
            .with_rotation_interval_seconds(30)
            .with_cookie_ttl_seconds(600)
            .with_cookie_name("__session__".to_string())
            .with_production(true);
        assert_eq!(config.session_lifetime_seconds(), 120);
        assert_eq!(config.rotation_interval_seconds(), 30);
        assert_eq!(config.cookie_ttl_seconds(), 600);
        assert_eq!(config.cookie_name(), "__session__");
        assert!(config.cookie_secure());
    }

    #[test]
    fn valid_pass_keeps_session_active() -> Result<()> {
        let guard = SessionGuard::new(GuardConfig::new());
        let mut record = bound_record();
        let token = ClientToken::new("token");

        let outcome = guard.validate(&mut record, &origin(), Some(&token), NOW)?;
        assert_eq!(outcome.status, SessionStatus::Active);
        assert!(outcome.cookies.is_empty());
        assert!(outcome.rotation.is_none());
        assert!(record.is_authenticated());
        Ok(())
    }

    #[test]
    fn mismatched_origin_invalidates_without_touching_credential() -> Result<()> {
        let guard = SessionGuard::new(GuardConfig::new());
        let mut record = bound_record();
        let token = ClientToken::new("token");
        let mut request = origin();
        request.port = 8080;

        let outcome = guard.validate(&mut record, &request, Some(&token), NOW)?;
        assert_eq!(outcome.status, SessionStatus::Invalidated);
        assert!(outcome.cookies.is_empty());
        assert!(!record.is_authenticated());
        Ok(())
    }

    #[test]
    fn due_rotation_emits_cookie_and_signal() -> Result<()> {
        let guard = SessionGuard::new(GuardConfig::new());
        let mut record = bound_record();
        record.token_time = Some(NOW - 1);
        let token = ClientToken::new("token");

        let outcome = guard.validate(&mut record, &origin(), Some(&token), NOW)?;
        assert_eq!(outcome.status, SessionStatus::Active);
        let signal = outcome.rotation.expect("rotation expected");
        assert_eq!(record.rotation_token.as_deref(), Some(signal.token()));
        assert_eq!(outcome.cookies.len(), 1);
        assert_eq!(outcome.cookies[0].value, signal.token());
        Ok(())
    }

    #[test]
    fn rotation_signal_header_pair() {
        let signal = RotationSignal {
            token: "fresh".to_string(),
        };
        assert_eq!(signal.header(), (ROTATION_SIGNAL_HEADER, "fresh"));
    }

    #[test]
    fn unauthenticated_record_reports_invalidated() -> Result<()> {
        let guard = SessionGuard::new(GuardConfig::new());
        let mut record = SessionRecord::default();
        let outcome = guard.validate(&mut record, &origin(), None, NOW)?;
        assert_eq!(outcome.status, SessionStatus::Invalidated);
        assert!(outcome.cookies.is_empty());
        Ok(())
    }
}
