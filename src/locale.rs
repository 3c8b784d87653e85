//! Supported locales and the locale resolution strategy.
//!
//! [`Locale`] is a closed set: an unsupported code cannot be represented, so
//! nothing downstream ever has to re-validate one. [`resolve`] implements the
//! fixed-priority detection strategy — 1) path, 2) cookie, 3) user agent,
//! 4) default — and is a pure, deterministic function of the request.

use std::fmt;

use tracing::debug;

use crate::request::Request;

/// Name of the cookie carrying the user's locale preference.
pub const LOCALE_COOKIE: &str = "locale";

/// A supported locale.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Locale {
    En,
    Ar,
}

impl Locale {
    /// Every supported locale, in declaration order.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ar];

    /// The locale used when nothing else matches.
    pub const DEFAULT: Locale = Locale::En;

    /// The lowercase wire code (e.g. `"en"`), as it appears in paths,
    /// cookies, and the locale tag header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Parses an exact lowercase code. Anything outside the supported set —
    /// including a tampered cookie value — is `None`, never an error.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == code)
    }

    /// Extracts the locale from a path's first segment, if that segment is a
    /// member of the supported set.
    ///
    /// Matching is against the closed set, not a two-letter pattern: `/ab/x`
    /// carries no locale even though `ab` looks like one, and `/arcade` does
    /// not match `ar`.
    pub fn from_path(path: &str) -> Option<Self> {
        let first = path.strip_prefix('/')?.split('/').next()?;
        Self::parse(first)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Determines the effective locale for a request.
///
/// Priority, first match wins:
/// 1. path — the user explicitly navigated to a locale, respect it;
/// 2. cookie — a stored preference, ignored if the value is not supported;
/// 3. `Accept-Language` negotiation;
/// 4. the default locale.
pub fn resolve(req: &Request) -> Locale {
    if let Some(locale) = Locale::from_path(req.path()) {
        return locale;
    }

    if let Some(value) = req.cookie(LOCALE_COOKIE) {
        match Locale::parse(value) {
            Some(locale) => return locale,
            // Tampered or stale cookie: treat as absent.
            None => debug!(value, "ignoring unsupported locale cookie"),
        }
    }

    if let Some(locale) = req.header("accept-language").and_then(negotiate) {
        return locale;
    }

    Locale::DEFAULT
}

/// Best-effort `Accept-Language` negotiation against the supported set.
///
/// Entries are parsed as `tag[;q=weight]`, ranked by weight (default 1.0,
/// zero-weight entries dropped), then matched in rank order: full tag first,
/// then the primary subtag, case-insensitively. `*` selects the default
/// locale. Malformed entries are skipped, so a garbage header degrades to
/// `None` — the caller falls back to the default — rather than failing.
fn negotiate(header: &str) -> Option<Locale> {
    let mut ranked: Vec<(f32, &str)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.trim().split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }
            let weight = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok())
                .unwrap_or(0.0);
            (weight > 0.0).then_some((weight, tag))
        })
        .collect();

    // Stable sort keeps header order among equal weights.
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    for (_, tag) in ranked {
        if tag == "*" {
            return Some(Locale::DEFAULT);
        }
        let tag = tag.to_ascii_lowercase();
        if let Some(locale) = Locale::parse(&tag) {
            return Some(locale);
        }
        let primary = tag.split('-').next().unwrap_or(&tag);
        if let Some(locale) = Locale::parse(primary) {
            return Some(locale);
        }
    }
    None
}
