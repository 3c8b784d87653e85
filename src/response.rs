//! Outgoing HTTP response type.
//!
//! A [`Response`] is created by whichever stage first short-circuits (a
//! redirect) or by the terminal handler, then flows back outward. Outer
//! stages may add headers on the way out; there is no removal API, so a
//! header set by an inner stage survives to the wire.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use http::StatusCode;
use http_body_util::Full;

/// An outgoing HTTP response.
///
/// ```rust
/// use portico::Response;
/// use http::StatusCode;
///
/// Response::html("<h1>hello</h1>");
/// Response::redirect("http://localhost/en/sign-in");
/// Response::status(StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// `200 OK` with an HTML body.
    pub fn html(body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        Self { status: StatusCode::OK, headers, body: body.into() }
    }

    /// `200 OK` with a plain-text body.
    pub fn text(body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        Self { status: StatusCode::OK, headers, body: body.into() }
    }

    /// Response with no body.
    pub fn status(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// `307 Temporary Redirect` to an absolute URL.
    ///
    /// 307 keeps the original method on replay, which is what an edge
    /// rewrite wants: a redirected `POST /dashboard` must stay a `POST`.
    pub fn redirect(location: impl AsRef<str>) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(location.as_ref()) {
            headers.insert(LOCATION, value);
        }
        Self { status: StatusCode::TEMPORARY_REDIRECT, headers, body: Bytes::new() }
    }

    pub fn status_code(&self) -> StatusCode { self.status }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Sets a header, last-write-wins. Invalid names or values are dropped
    /// silently rather than poisoning the response.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) =
            (name.parse::<HeaderName>(), HeaderValue::from_str(value))
        {
            self.headers.insert(name, value);
        }
    }

    /// True for any 3xx response.
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// The `Location` header, if present.
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::builder()
            .status(self.status)
            .body(Full::new(self.body))
            .unwrap_or_else(|_| http::Response::new(Full::new(Bytes::new())));
        *res.headers_mut() = self.headers;
        res
    }
}
