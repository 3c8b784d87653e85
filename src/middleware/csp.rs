//! Content-Security-Policy stage.

use crate::chain::Middleware;
use crate::handler::{Next, handler_fn};
use crate::middleware::nonce::NONCE_HEADER;

/// Renders the policy for a given nonce.
///
/// `'strict-dynamic'` lets nonce-authorized scripts load their own
/// dependencies; `'unsafe-inline'` in `style-src` is ignored by browsers
/// that understand nonces and keeps older ones working.
pub fn policy(nonce: &str) -> String {
    [
        "default-src 'self'".to_owned(),
        format!("script-src 'self' 'nonce-{nonce}' 'strict-dynamic'"),
        format!("style-src 'self' 'nonce-{nonce}' 'unsafe-inline'"),
        "img-src 'self' data: blob: https:".to_owned(),
        "font-src 'self' data:".to_owned(),
        "connect-src 'self'".to_owned(),
        "frame-ancestors 'none'".to_owned(),
        "base-uri 'self'".to_owned(),
        "form-action 'self'".to_owned(),
    ]
    .join("; ")
}

/// Sets `Content-Security-Policy` on the outgoing response, embedding the
/// request's nonce into `script-src` and `style-src`.
///
/// The header goes on the *response*, never the request — browsers read CSP
/// from response headers. When the feature flag is off, or the request
/// carries no nonce (the [`Nonce`] stage was not wired outside this one),
/// the stage is a transparent pass-through.
///
/// The flag is captured at construction; rebuilding the chain is the only
/// way to flip it.
///
/// [`Nonce`]: crate::middleware::Nonce
pub struct Csp {
    enabled: bool,
}

impl Csp {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Middleware for Csp {
    fn wrap(&self, next: Next) -> Next {
        let enabled = self.enabled;
        handler_fn(move |req| {
            let next = next.clone();
            async move {
                let nonce = req
                    .header(NONCE_HEADER)
                    .filter(|_| enabled)
                    .map(str::to_owned);
                match nonce {
                    Some(nonce) => {
                        let mut res = next.call(req).await?;
                        res.set_header("content-security-policy", &policy(&nonce));
                        Ok(res)
                    }
                    None => next.call(req).await,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::response::Response;

    async fn page(_req: Request) -> Result<Response, crate::Error> {
        Ok(Response::html("<p>ok</p>"))
    }

    #[tokio::test]
    async fn sets_policy_when_enabled_and_nonce_present() {
        let handler = Csp::new(true).wrap(handler_fn(page));
        let req = Request::get("http://localhost/en").with_header(NONCE_HEADER, "abc123");

        let res = handler.call(req).await.unwrap();

        let csp = res.header("content-security-policy").unwrap();
        assert!(csp.contains("script-src 'self' 'nonce-abc123' 'strict-dynamic'"));
        assert!(csp.contains("style-src 'self' 'nonce-abc123'"));
        assert!(csp.contains("frame-ancestors 'none'"));
    }

    #[tokio::test]
    async fn pass_through_when_disabled() {
        let handler = Csp::new(false).wrap(handler_fn(page));
        let req = Request::get("http://localhost/en").with_header(NONCE_HEADER, "abc123");

        let res = handler.call(req).await.unwrap();
        assert_eq!(res.header("content-security-policy"), None);
    }

    #[tokio::test]
    async fn pass_through_when_nonce_absent() {
        let handler = Csp::new(true).wrap(handler_fn(page));
        let res = handler.call(Request::get("http://localhost/en")).await.unwrap();
        assert_eq!(res.header("content-security-policy"), None);
    }

    #[test]
    fn policy_is_semicolon_joined() {
        let p = policy("n");
        assert!(p.starts_with("default-src 'self'; script-src"));
        assert_eq!(p.matches("; ").count(), 8);
    }
}
