//! Built-in middleware stages.
//!
//! The intended wiring, outermost first:
//!
//! ```text
//! Nonce → Csp → ClientHints → AuthGate → I18n → page renderer
//! ```
//!
//! Each stage either short-circuits with a response (a redirect) or forwards
//! the request — possibly a copy carrying extra headers — to its inner
//! neighbour, and may annotate the response on the way back out.

mod auth;
mod client_hints;
mod csp;
mod i18n;
mod nonce;

pub use auth::{AuthGate, SessionStore};
pub use client_hints::ClientHints;
pub use csp::Csp;
pub use i18n::{I18n, LOCALE_HEADER};
pub use nonce::{NONCE_HEADER, Nonce};
