//! Middleware trait and chain composition.
//!
//! A [`Middleware`] is a factory: given the next handler, it returns the
//! wrapped handler. [`compose`] folds an ordered list of factories over a
//! terminal handler so that the *first* stage in the list is the *outermost*
//! one — it sees the raw request first, can short-circuit before anything
//! else runs, and is the last to touch the outgoing response.
//!
//! Composition happens once at startup. Stage configuration (feature flags,
//! the session collaborator) is captured at construction; changing it means
//! rebuilding the chain, not mutating it live.

use crate::config::Exclude;
use crate::handler::{Handler, Next, handler_fn};

/// A middleware stage factory.
///
/// `wrap` is called once per stage at chain-build time, never per request.
/// The returned handler closes over `next` and whatever static configuration
/// the stage carries; it must hold no per-request state across calls.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: Next) -> Next;
}

/// Folds `stages` over `terminal`, last to first:
/// `handler_i = stages[i].wrap(handler_{i+1})`, with `handler_n = terminal`.
///
/// The composer does no error handling of its own — an `Err` from any stage
/// propagates unchanged to the caller.
pub fn compose(stages: Vec<Box<dyn Middleware>>, terminal: Next) -> Next {
    stages
        .into_iter()
        .rev()
        .fold(terminal, |next, stage| stage.wrap(next))
}

// ── Chain builder ─────────────────────────────────────────────────────────────

/// Ordered middleware chain builder.
///
/// ```rust,no_run
/// use portico::{Chain, Error, Request, Response};
/// use portico::middleware::{ClientHints, Nonce};
///
/// async fn render(_req: Request) -> Result<Response, Error> {
///     Ok(Response::html("<h1>page</h1>"))
/// }
///
/// let handler = Chain::new()
///     .stage(Nonce)
///     .stage(ClientHints)
///     .handler(render);
/// ```
pub struct Chain {
    stages: Vec<Box<dyn Middleware>>,
    exclude: Exclude,
}

impl Chain {
    pub fn new() -> Self {
        Self { stages: Vec::new(), exclude: Exclude::none() }
    }

    /// Appends a stage. Earlier stages are outermost; order is significant.
    pub fn stage(mut self, stage: impl Middleware) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Paths matching `exclude` bypass every stage and go straight to the
    /// terminal handler (API routes, static assets). This is hosting
    /// configuration, not stage logic.
    pub fn exclude(mut self, exclude: Exclude) -> Self {
        self.exclude = exclude;
        self
    }

    /// Composes the chain around `terminal`, yielding the single handler the
    /// server dispatches to.
    pub fn handler(self, terminal: impl Handler) -> Next {
        let terminal = terminal.into_handler();
        let chain = compose(self.stages, terminal.clone());
        let exclude = self.exclude;
        handler_fn(move |req| {
            let handler = if exclude.matches(req.path()) { &terminal } else { &chain };
            let handler = handler.clone();
            async move { handler.call(req).await }
        })
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
