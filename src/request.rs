//! Incoming HTTP request type.
//!
//! A [`Request`] is built once per inbound call and flows through the chain.
//! Stages never mutate the caller's value: a stage that wants downstream
//! handlers to see a different header calls [`Request::with_header`] and
//! forwards the copy.

use std::collections::HashMap;

use http::header::{COOKIE, HeaderMap, HeaderName, HeaderValue};
use http::Method;
use url::Url;

/// An incoming HTTP request.
#[derive(Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
}

impl Request {
    /// Builds a request from its parts. Cookies are parsed once from the
    /// `Cookie` header; later lookups are map reads.
    pub fn new(method: Method, url: Url, headers: HeaderMap) -> Self {
        let cookies = parse_cookies(&headers);
        Self { method, url, headers, cookies }
    }

    /// Convenience constructor for a `GET` to an absolute URL.
    ///
    /// # Panics
    ///
    /// Panics if `url` is not a valid absolute URL. Intended for demos and
    /// tests; server dispatch builds requests via [`Request::new`].
    pub fn get(url: &str) -> Self {
        let url = url.parse().expect("invalid absolute URL");
        Self::new(Method::GET, url, HeaderMap::new())
    }

    pub fn method(&self) -> &Method { &self.method }

    /// The absolute request URL, used as the base for redirect targets.
    pub fn url(&self) -> &Url { &self.url }

    /// The request path. Always starts with `/`.
    pub fn path(&self) -> &str { self.url.path() }

    /// The raw query string, without the leading `?`, if any.
    pub fn query(&self) -> Option<&str> { self.url.query() }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// Cookie lookup by name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns a copy of this request with one header set (last-write-wins).
    ///
    /// This is how a stage passes data downstream: the copy carries the
    /// override, the original stays untouched in the caller's hands.
    pub fn with_header(&self, name: &str, value: &str) -> Self {
        let mut forwarded = self.clone();
        if let (Ok(name), Ok(value)) =
            (name.parse::<HeaderName>(), HeaderValue::from_str(value))
        {
            let is_cookie = name == COOKIE;
            forwarded.headers.insert(name, value);
            if is_cookie {
                forwarded.cookies = parse_cookies(&forwarded.headers);
            }
        }
        forwarded
    }

    /// Resolves a path-and-query (e.g. `/ar/sign-in?from=%2Fx`) against this
    /// request's origin, yielding an absolute redirect target.
    pub(crate) fn absolute(&self, path_and_query: &str) -> String {
        format!("{}{}", self.url.origin().ascii_serialization(), path_and_query)
    }
}

/// Parses the `Cookie` header into a name → value map.
///
/// Malformed pairs are skipped, not rejected: a tampered cookie must read as
/// absent, never as an error.
fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let Some(raw) = headers.get(COOKIE).and_then(|v| v.to_str().ok()) else {
        return HashMap::new();
    };
    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_owned(), value.trim().to_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cookie_header(raw: &str) -> Request {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, raw.parse().unwrap());
        Request::new(Method::GET, "http://localhost/".parse().unwrap(), headers)
    }

    #[test]
    fn cookies_parse_and_trim() {
        let req = with_cookie_header("locale=ar; theme=dark");
        assert_eq!(req.cookie("locale"), Some("ar"));
        assert_eq!(req.cookie("theme"), Some("dark"));
        assert_eq!(req.cookie("missing"), None);
    }

    #[test]
    fn malformed_cookie_pairs_are_skipped() {
        let req = with_cookie_header("garbage; =nameless; locale=en");
        assert_eq!(req.cookie("locale"), Some("en"));
        assert_eq!(req.cookie("garbage"), None);
    }

    #[test]
    fn with_header_leaves_original_untouched() {
        let req = Request::get("http://localhost/about");
        let forwarded = req.with_header("x-locale", "ar");
        assert_eq!(forwarded.header("x-locale"), Some("ar"));
        assert_eq!(req.header("x-locale"), None);
    }

    #[test]
    fn overriding_the_cookie_header_refreshes_cookies() {
        let req = Request::get("http://localhost/").with_header("cookie", "locale=ar");
        assert_eq!(req.cookie("locale"), Some("ar"));
    }

    #[test]
    fn absolute_resolves_against_origin() {
        let req = Request::get("http://example.com:8080/en/pricing?tier=pro");
        assert_eq!(
            req.absolute("/ar/pricing?tier=pro"),
            "http://example.com:8080/ar/pricing?tier=pro"
        );
    }
}
