//! Startup configuration: feature flags and the chain-bypass filter.
//!
//! Everything here is read once when the chain is built. Flags are captured
//! by the stages that care about them; flipping an environment variable on a
//! running process changes nothing until the chain is rebuilt.

use tracing::info;

/// Feature flags, read from the environment at startup.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// Emit a `Content-Security-Policy` header on page responses.
    pub csp_enabled: bool,
}

impl Config {
    /// Reads `CSP_ENABLED` (`"true"` to enable, anything else — including
    /// absence — disables).
    pub fn from_env() -> Self {
        let csp_enabled = std::env::var("CSP_ENABLED").is_ok_and(|v| v == "true");
        info!(csp_enabled, "configuration loaded");
        Self { csp_enabled }
    }
}

// ── Chain bypass ──────────────────────────────────────────────────────────────

/// Paths the middleware chain never sees.
///
/// The edge pipeline is for page requests. API routes and static assets go
/// straight to the terminal handler: no locale redirect for `/favicon.ico`,
/// no auth gate in front of `/api/health`.
#[derive(Clone, Debug)]
pub struct Exclude {
    prefixes: Vec<String>,
    dotted: bool,
}

impl Exclude {
    /// Excludes nothing; every request traverses the chain.
    pub fn none() -> Self {
        Self { prefixes: Vec::new(), dotted: false }
    }

    /// Excludes the given path prefixes, matched on segment boundaries:
    /// `"/api"` excludes `/api` and `/api/v1/users` but not `/apiary`.
    pub fn prefixes(prefixes: &[&str]) -> Self {
        Self { prefixes: prefixes.iter().map(|p| (*p).to_owned()).collect(), dotted: false }
    }

    /// The usual exclusions for a page pipeline: `/api` plus any path
    /// containing a dot (`/favicon.ico`, `/robots.txt`, bundled assets).
    pub fn assets() -> Self {
        Self { prefixes: vec!["/api".to_owned()], dotted: true }
    }

    /// Also exclude dot-containing paths.
    pub fn with_dotted(mut self) -> Self {
        self.dotted = true;
        self
    }

    pub(crate) fn matches(&self, path: &str) -> bool {
        if self.dotted && path.contains('.') {
            return true;
        }
        self.prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matches_on_segment_boundary() {
        let exclude = Exclude::prefixes(&["/api"]);
        assert!(exclude.matches("/api"));
        assert!(exclude.matches("/api/v1/users"));
        assert!(!exclude.matches("/apiary"));
        assert!(!exclude.matches("/en/api-docs"));
    }

    #[test]
    fn assets_excludes_dotted_paths() {
        let exclude = Exclude::assets();
        assert!(exclude.matches("/favicon.ico"));
        assert!(exclude.matches("/assets/app.v2.js"));
        assert!(!exclude.matches("/en/dashboard"));
    }

    #[test]
    fn none_excludes_nothing() {
        assert!(!Exclude::none().matches("/api"));
        assert!(!Exclude::none().matches("/favicon.ico"));
    }
}
