//! Minimal portico example — the full edge pipeline around a stub renderer.
//!
//! Run with:
//!   RUST_LOG=debug CSP_ENABLED=true cargo run --example edge
//!
//! Try:
//!   curl -i http://localhost:3000/                # → 307 /sign-in (no session)
//!   curl -i http://localhost:3000/pricing \
//!        -H 'accept-language: ar;q=0.9,en;q=0.5'  # → 307 /ar/pricing
//!   curl -i http://localhost:3000/en/dashboard \
//!        -b session=demo                          # → 200 with CSP + hints
//!   curl -i http://localhost:3000/ar/sign-in \
//!        -b session=demo                          # → 307 /ar/dashboard

use std::sync::Arc;

use portico::middleware::{AuthGate, ClientHints, Csp, I18n, Nonce, SessionStore};
use portico::{Chain, Config, Error, Exclude, Request, Response, Server};

/// Demo session lookup: any `session` cookie counts as signed in. A real
/// deployment verifies a token against its identity collaborator here.
struct CookieSessions;

#[async_trait::async_trait]
impl SessionStore for CookieSessions {
    async fn has_valid_session(&self, req: &Request) -> Result<bool, Error> {
        Ok(req.cookie("session").is_some())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let handler = Chain::new()
        .stage(Nonce)
        .stage(Csp::new(config.csp_enabled))
        .stage(ClientHints)
        .stage(AuthGate::new(Arc::new(CookieSessions)))
        .stage(I18n)
        .exclude(Exclude::assets())
        .handler(render);

    Server::bind("0.0.0.0:3000")
        .serve(handler)
        .await
        .expect("server error");
}

// The terminal handler — where the page renderer would live. By the time a
// request lands here its path carries a supported locale prefix and the
// `x-locale` tag matches it.
async fn render(req: Request) -> Result<Response, Error> {
    let locale = req.header("x-locale").unwrap_or("en");
    let nonce = req.header("x-nonce").unwrap_or("");
    Ok(Response::html(format!(
        "<!doctype html><html lang=\"{locale}\"><body>\
         <script nonce=\"{nonce}\">console.log('hello from {locale}')</script>\
         </body></html>"
    )))
}
