//! # portico
//!
//! An edge-request middleware pipeline. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Before any page renders, a small ordered chain of interceptors decides
//! three things: which locale the response speaks, which security headers it
//! carries, and whether the visitor belongs on this page at all. portico is
//! that chain. Page rendering, form validation, credential exchange, and
//! message catalogs are collaborators — portico hands them a request whose
//! path is guaranteed to carry a valid locale prefix, and nothing else.
//!
//! What the collaborators own — portico intentionally ignores:
//!
//! - **Rendering** — the terminal handler you pass to [`Chain::handler`]
//! - **Session issuance and verification** — behind
//!   [`SessionStore`](middleware::SessionStore)
//! - **Translation catalogs** — portico only guarantees the locale tag is a
//!   member of the supported set, so a catalog lookup cannot miss
//!
//! What's left for portico:
//!
//! - Ordered composition — first stage wired is outermost, sees the raw
//!   request first and the finished response last; a short-circuit skips
//!   everything inside it
//! - Locale negotiation — path, then cookie, then `Accept-Language`, then
//!   the default, with a locale-prefixing redirect when the path has none
//! - Auth gating — redirect to sign-in, redirect away from sign-in, or pass
//!   through, decided per request from the path and the session
//! - Security headers — a per-request CSP nonce and color-scheme client
//!   hints on the way out
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use portico::middleware::{AuthGate, ClientHints, Csp, I18n, Nonce, SessionStore};
//! use portico::{Chain, Config, Error, Exclude, Request, Response, Server};
//!
//! struct Sessions;
//!
//! #[async_trait::async_trait]
//! impl SessionStore for Sessions {
//!     async fn has_valid_session(&self, req: &Request) -> Result<bool, Error> {
//!         Ok(req.cookie("session").is_some())
//!     }
//! }
//!
//! async fn render(req: Request) -> Result<Response, Error> {
//!     let locale = req.header("x-locale").unwrap_or("en");
//!     Ok(Response::html(format!("<html lang=\"{locale}\"></html>")))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env();
//!
//!     let handler = Chain::new()
//!         .stage(Nonce)
//!         .stage(Csp::new(config.csp_enabled))
//!         .stage(ClientHints)
//!         .stage(AuthGate::new(Arc::new(Sessions)))
//!         .stage(I18n)
//!         .exclude(Exclude::assets())
//!         .handler(render);
//!
//!     Server::bind("0.0.0.0:3000").serve(handler).await.unwrap();
//! }
//! ```

mod chain;
mod config;
mod error;
mod handler;
mod locale;
mod request;
mod response;
mod server;

pub mod middleware;

pub use chain::{Chain, Middleware, compose};
pub use config::{Config, Exclude};
pub use error::Error;
pub use handler::{Handler, Next, handler_fn};
#[doc(hidden)]
pub use handler::ErasedHandler;
pub use locale::{LOCALE_COOKIE, Locale, resolve as resolve_locale};
pub use request::Request;
pub use response::Response;
pub use server::Server;
