//! Per-request CSP nonce stage.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::chain::Middleware;
use crate::handler::{Next, handler_fn};

/// Request header carrying the per-request nonce for inner stages.
pub const NONCE_HEADER: &str = "x-nonce";

/// Attaches a fresh cryptographically random nonce to every forwarded
/// request under [`NONCE_HEADER`]. Never reused across requests.
///
/// The nonce authorizes inline scripts and styles once [`Csp`] embeds it in
/// the policy header; this stage must therefore sit outside the CSP stage.
///
/// [`Csp`]: crate::middleware::Csp
pub struct Nonce;

fn generate() -> String {
    let mut bytes = [0_u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

impl Middleware for Nonce {
    fn wrap(&self, next: Next) -> Next {
        handler_fn(move |req| {
            let next = next.clone();
            async move {
                let forwarded = req.with_header(NONCE_HEADER, &generate());
                next.call(forwarded).await
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::response::Response;

    #[tokio::test]
    async fn forwarded_request_carries_a_nonce() {
        let handler = Nonce.wrap(handler_fn(|req: Request| async move {
            assert!(req.header(NONCE_HEADER).is_some_and(|n| !n.is_empty()));
            Ok(Response::text("ok"))
        }));

        let res = handler.call(Request::get("http://localhost/")).await.unwrap();
        assert_eq!(res.status_code(), http::StatusCode::OK);
    }

    #[test]
    fn nonces_are_unique_and_url_safe() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert!(!a.is_empty());
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn callers_request_is_not_mutated() {
        let req = Request::get("http://localhost/");
        let handler = Nonce.wrap(handler_fn(|_req: Request| async {
            Ok(Response::text("ok"))
        }));
        handler.call(req.clone()).await.unwrap();
        assert_eq!(req.header(NONCE_HEADER), None);
    }
}
