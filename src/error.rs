//! Unified error type.

use std::fmt;

/// The error type returned by portico's fallible operations.
///
/// Policy outcomes (redirects, pass-throughs) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: binding to a port, accepting a connection, or a
/// session-lookup collaborator that could not answer at all. The chain never
/// catches these — they travel out to the server's error boundary, which
/// answers the request with a bodyless 500.
#[derive(Debug)]
pub enum Error {
    /// Socket-level failure: bind or accept.
    Io(std::io::Error),
    /// The session collaborator failed — not "no session", but "could not
    /// look up". Fail-stop: never downgraded to unauthenticated.
    Session(String),
}

impl Error {
    /// Builds a session-lookup failure from any displayable cause.
    pub fn session(cause: impl fmt::Display) -> Self {
        Self::Session(cause.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Session(cause) => write!(f, "session lookup failed: {cause}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Session(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
