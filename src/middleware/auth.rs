//! Authentication-aware route gating.
//!
//! The gate holds no state machine: every request is classified from scratch
//! by two path predicates plus the session collaborator's answer, then the
//! decision table in [`AuthGate`] picks redirect or pass-through.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use url::form_urlencoded;

use crate::chain::Middleware;
use crate::error::Error;
use crate::handler::{Next, handler_fn};
use crate::locale::{self, Locale};
use crate::request::Request;
use crate::response::Response;

/// The session-lookup capability.
///
/// Token issuance and cryptographic verification live behind this trait; the
/// gate only asks "is there a valid session on this request". An `Err` means
/// the collaborator could not answer — it propagates to the server's error
/// boundary rather than being read as "no session".
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    async fn has_valid_session(&self, req: &Request) -> Result<bool, Error>;
}

/// Redirects unauthenticated visitors off protected pages and authenticated
/// ones off the sign-in page.
///
/// Decision table, first match wins:
///
/// | session | protected | sign-in | action |
/// |---------|-----------|---------|--------|
/// | no      | yes       | —       | redirect to sign-in, `?from=` the attempted path |
/// | yes     | —         | yes     | redirect to dashboard |
/// | otherwise           |         | pass through |
///
/// "Protected" covers `/dashboard` with any sub-path *and the root page* —
/// intentional: an unauthenticated visitor landing on `/` is sent to
/// sign-in, an authenticated one is served the app. Redirect targets carry
/// the request's locale prefix unless it is the default locale.
///
/// The session collaborator is constructor-injected, so the gate runs
/// against a fake store in tests.
pub struct AuthGate {
    sessions: Arc<dyn SessionStore>,
}

impl AuthGate {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }
}

impl Middleware for AuthGate {
    fn wrap(&self, next: Next) -> Next {
        let sessions = Arc::clone(&self.sessions);
        handler_fn(move |req| {
            let sessions = Arc::clone(&sessions);
            let next = next.clone();
            async move {
                let has_session = sessions.has_valid_session(&req).await?;
                let stripped = strip_locale(req.path());

                if !has_session && is_protected(stripped) {
                    let target = sign_in_target(&req, stripped);
                    debug!(path = req.path(), %target, "no session on protected route");
                    return Ok(Response::redirect(req.absolute(&target)));
                }

                if has_session && is_sign_in(stripped) {
                    let target = prefixed(locale::resolve(&req), "/dashboard");
                    debug!(path = req.path(), %target, "authenticated visit to sign-in");
                    return Ok(Response::redirect(req.absolute(&target)));
                }

                next.call(req).await
            }
        })
    }
}

// ── Path classification ───────────────────────────────────────────────────────

/// Drops a leading locale segment, if the segment is a member of the
/// supported set. `/ar/dashboard/billing` → `/dashboard/billing`, `/ar` →
/// `/`, `/about` → `/about`. Matching against the closed set means
/// `/ab/dashboard` keeps its `/ab` — two letters alone are not a locale.
fn strip_locale(path: &str) -> &str {
    match Locale::from_path(path) {
        Some(locale) => {
            let rest = &path[1 + locale.as_str().len()..];
            if rest.is_empty() { "/" } else { rest }
        }
        None => path,
    }
}

/// The dashboard (with any sub-path) and the root page itself.
fn is_protected(stripped: &str) -> bool {
    stripped == "/"
        || stripped == "/dashboard"
        || stripped.starts_with("/dashboard/")
}

fn is_sign_in(stripped: &str) -> bool {
    stripped == "/sign-in" || stripped.starts_with("/sign-in/")
}

/// Prepends the locale segment unless `locale` is the default.
fn prefixed(locale: Locale, path: &str) -> String {
    if locale == Locale::DEFAULT {
        path.to_owned()
    } else {
        format!("/{locale}{path}")
    }
}

/// Builds the sign-in redirect target, carrying the attempted path in a
/// `from` query parameter so the app can return the user after sign-in.
/// `/` and `/dashboard` are the post-sign-in defaults already — no `from`.
fn sign_in_target(req: &Request, stripped: &str) -> String {
    let mut target = prefixed(locale::resolve(req), "/sign-in");
    if stripped != "/" && stripped != "/dashboard" {
        target.push_str("?from=");
        target.extend(form_urlencoded::byte_serialize(stripped.as_bytes()));
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSessions(Result<bool, ()>);

    #[async_trait]
    impl SessionStore for FakeSessions {
        async fn has_valid_session(&self, _req: &Request) -> Result<bool, Error> {
            self.0.map_err(|()| Error::session("store unreachable"))
        }
    }

    fn gate(sessions: Result<bool, ()>) -> Next {
        AuthGate::new(Arc::new(FakeSessions(sessions))).wrap(handler_fn(
            |_req: Request| async { Ok(Response::text("page")) },
        ))
    }

    #[tokio::test]
    async fn dashboard_without_session_redirects_to_sign_in_without_from() {
        let res = gate(Ok(false))
            .call(Request::get("http://localhost/dashboard"))
            .await
            .unwrap();
        // `from=/dashboard` would be redundant: it is the post-sign-in default.
        assert_eq!(res.location(), Some("http://localhost/sign-in"));
    }

    #[tokio::test]
    async fn root_without_session_redirects_to_sign_in() {
        let res = gate(Ok(false))
            .call(Request::get("http://localhost/"))
            .await
            .unwrap();
        assert_eq!(res.location(), Some("http://localhost/sign-in"));
    }

    #[tokio::test]
    async fn localized_sub_path_keeps_prefix_and_from_param() {
        let res = gate(Ok(false))
            .call(Request::get("http://localhost/ar/dashboard/billing"))
            .await
            .unwrap();
        assert_eq!(
            res.location(),
            Some("http://localhost/ar/sign-in?from=%2Fdashboard%2Fbilling")
        );
    }

    #[tokio::test]
    async fn authenticated_sign_in_visit_redirects_to_dashboard() {
        // Default locale: no prefix on the target.
        let res = gate(Ok(true))
            .call(Request::get("http://localhost/en/sign-in"))
            .await
            .unwrap();
        assert_eq!(res.location(), Some("http://localhost/dashboard"));
    }

    #[tokio::test]
    async fn authenticated_sign_in_visit_keeps_non_default_locale() {
        let res = gate(Ok(true))
            .call(Request::get("http://localhost/ar/sign-in"))
            .await
            .unwrap();
        assert_eq!(res.location(), Some("http://localhost/ar/dashboard"));
    }

    #[tokio::test]
    async fn unprotected_path_passes_through_without_session() {
        let res = gate(Ok(false))
            .call(Request::get("http://localhost/en/about"))
            .await
            .unwrap();
        assert_eq!(res.status_code(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn authenticated_protected_path_passes_through() {
        let res = gate(Ok(true))
            .call(Request::get("http://localhost/en/dashboard"))
            .await
            .unwrap();
        assert_eq!(res.status_code(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn lookup_failure_is_fail_stop() {
        let err = gate(Err(()))
            .call(Request::get("http://localhost/en/about"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Session(_)));
    }

    #[test]
    fn two_letters_are_not_a_locale_prefix() {
        assert_eq!(strip_locale("/ab/dashboard"), "/ab/dashboard");
        assert_eq!(strip_locale("/ar/dashboard"), "/dashboard");
        assert_eq!(strip_locale("/ar"), "/");
        assert_eq!(strip_locale("/about"), "/about");
    }

    #[test]
    fn protection_covers_dashboard_subtree_and_root_only() {
        assert!(is_protected("/"));
        assert!(is_protected("/dashboard"));
        assert!(is_protected("/dashboard/billing"));
        assert!(!is_protected("/dashboard-beta"));
        assert!(!is_protected("/about"));
    }
}
