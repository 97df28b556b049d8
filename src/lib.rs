//! # Sentinela (session binding & rotation tokens)
//!
//! `sentinela` protects an *already-authenticated* server-side session
//! against hijacking and replay. It is not an authentication system; an
//! external step proves identity, freezes the request's fingerprint into the
//! session, and from then on every request runs one validation pass here.
//!
//! ## Fingerprint Binding
//!
//! At authentication time the session records the environment that created
//! it: user agent, hostname, HTTP host, server software, and port. Each
//! subsequent request is compared field for field against that frozen
//! fingerprint; the first mismatch clears the session's auth state.
//!
//! ## Rotation Token
//!
//! A high-entropy token is shared between a long-lived client cookie and the
//! session record, compared in constant time on every request and replaced
//! on a sliding schedule (at most once per rotation interval). A missing or
//! stale token clears the session.
//!
//! ## Sliding Expiration
//!
//! Every validated request pushes the session deadline forward by the
//! configured lifetime, while the previous deadline has not lapsed. A lapsed
//! session is cleared and the client credential is expired.
//!
//! ## Fail-Closed Policy
//!
//! Protocol failures never raise errors: malformed state, fingerprint drift,
//! token mismatch, and expiry all resolve to silent invalidation. Errors are
//! reserved for collaborator faults (random source, session store), which
//! abort the request instead of degrading it.
//!
//! All state lives in the [`SessionRecord`] the caller passes in; credential
//! writes and rotation announcements come back as explicit values in the
//! [`Outcome`]. The session store must serialize access per session
//! identifier; see [`SessionStore`].

mod cookie;
mod expiry;
mod guard;
mod origin;
mod record;
mod rotation;
mod store;
mod token;

pub use cookie::CookieDirective;
pub use expiry::validate_time;
pub use guard::{
    GuardConfig, Outcome, ROTATION_SIGNAL_HEADER, RotationSignal, SessionGuard, SessionStatus,
};
pub use origin::{RequestOrigin, ValidationResult, validate_origin};
pub use record::{AuthRecord, SessionRecord};
pub use rotation::{RotationEvent, is_rotation_due, validate_and_rotate};
pub use store::{MemoryStore, SessionStore};
pub use token::{ClientToken, generate_rotation_token};
