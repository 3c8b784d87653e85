//! Color-scheme client-hint stage.

use crate::chain::Middleware;
use crate::handler::{Next, handler_fn};

const HINT: &str = "Sec-CH-Prefers-Color-Scheme";

/// Advertises the `Sec-CH-Prefers-Color-Scheme` client hint on every
/// response: `Accept-CH` requests it, `Critical-CH` marks it critical (the
/// browser retries the request with the hint if it was missing), and `Vary`
/// keeps caches from serving a dark-mode page to a light-mode client.
///
/// Unconditional: headers are set after the inner chain has produced its
/// response, whatever that response is.
pub struct ClientHints;

impl Middleware for ClientHints {
    fn wrap(&self, next: Next) -> Next {
        handler_fn(move |req| {
            let next = next.clone();
            async move {
                let mut res = next.call(req).await?;
                res.set_header("accept-ch", HINT);
                res.set_header("vary", HINT);
                res.set_header("critical-ch", HINT);
                Ok(res)
            }
        })
    }
}
