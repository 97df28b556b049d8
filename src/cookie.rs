//! Persistent credential directives handed to the transport collaborator.
//!
//! The crate never touches cookie headers itself; it returns these values
//! and the embedding server applies them. Deleting a credential is a set
//! with an already-past expiry.

use serde::{Deserialize, Serialize};

/// One cookie write the transport should perform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieDirective {
    pub name: String,
    pub value: String,
    /// Absolute unix expiry. In the past for deletions.
    pub expires_at: i64,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl CookieDirective {
    /// Long-lived credential carrying the rotation token.
    #[must_use]
    pub fn persistent(
        name: &str,
        value: &str,
        expires_at: i64,
        domain: &str,
        secure: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            expires_at,
            path: "/".to_string(),
            domain: Some(domain.to_string()),
            secure,
            http_only: true,
        }
    }

    /// Expire the credential so the client deletes it.
    #[must_use]
    pub fn delete(name: &str, expires_at: i64) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            expires_at,
            path: "/".to_string(),
            domain: None,
            secure: false,
            http_only: true,
        }
    }

    /// Render a `Set-Cookie` value relative to the current time.
    ///
    /// SameSite is left to the transport collaborator.
    #[must_use]
    pub fn header_value(&self, now: i64) -> String {
        let max_age = (self.expires_at - now).max(0);
        let mut cookie = format!(
            "{}={}; Path={}; Max-Age={max_age}",
            self.name, self.value, self.path
        );
        if let Some(domain) = &self.domain {
            cookie.push_str(&format!("; Domain={domain}"));
        }
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
