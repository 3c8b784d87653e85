//! Locale path normalizer.

use tracing::debug;

use crate::chain::Middleware;
use crate::handler::{Next, handler_fn};
use crate::locale::{self, Locale};
use crate::response::Response;

/// Header carrying the effective locale: set on the forwarded request for
/// the renderer's message-catalog lookup, and mirrored on the response for
/// observability.
pub const LOCALE_HEADER: &str = "x-locale";

/// Guarantees every path reaching the renderer carries an explicit,
/// supported locale prefix.
///
/// - Prefix present: tag the forwarded request with [`LOCALE_HEADER`], run
///   the inner chain, mirror the tag onto the response.
/// - Prefix absent: resolve the locale, redirect to
///   `/{locale}{original-path}` with the query string preserved verbatim.
///   Always short-circuits — the redirected request traverses the whole
///   chain again. Every locale gets a prefix here, the default included.
///
/// Downstream of this stage (when it forwards), the path's first segment is
/// always a member of the supported set, so the catalog lookup cannot miss.
pub struct I18n;

impl Middleware for I18n {
    fn wrap(&self, next: Next) -> Next {
        handler_fn(move |req| {
            let next = next.clone();
            async move {
                match Locale::from_path(req.path()) {
                    Some(found) => {
                        let forwarded = req.with_header(LOCALE_HEADER, found.as_str());
                        let mut res = next.call(forwarded).await?;
                        res.set_header(LOCALE_HEADER, found.as_str());
                        Ok(res)
                    }
                    None => {
                        let resolved = locale::resolve(&req);
                        let mut target = format!("/{resolved}{}", req.path());
                        if let Some(query) = req.query() {
                            target.push('?');
                            target.push_str(query);
                        }
                        debug!(path = req.path(), %target, "adding locale prefix");
                        Ok(Response::redirect(req.absolute(&target)))
                    }
                }
            }
        })
    }
}
