//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The chain holds handlers of *different* concrete types behind a single
//! alias: the terminal page handler the application supplies, and the
//! closure each middleware stage wraps around its inner neighbour. Rust
//! needs one concrete type to store them uniformly, so we use trait objects
//! (`dyn ErasedHandler`) and hide the concrete type behind a vtable.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn render(req: Request) -> Result<Response, Error> { … }
//!        ↓ chain.handler(render)
//! render.into_handler()                      ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(render))                ← heap-allocated wrapper
//!        ↓  stored as Next = Arc<dyn ErasedHandler>
//! next.call(req)  at request time            ← one vtable dispatch
//! ```
//!
//! The only runtime cost per stage per request is one Arc clone (atomic inc)
//! plus one virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future resolving to a handler outcome.
///
/// `Pin<Box<…>>` because the runtime must poll the future in place; `Send +
/// 'static` so tokio may move it across worker threads.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// definition of the public [`Next`] alias. External crates cannot usefully
/// implement it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// The inner handler a middleware stage forwards to.
///
/// `Arc` gives cheap, thread-safe shared ownership: wrapping a stage clones
/// the pointer, not the handler.
pub type Next = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid terminal handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request) -> Result<Response, Error>
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_handler(self) -> Next;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
}

/// Implement `Handler` for any function with the right signature.
///
/// `Fn(Request) -> Fut` covers named `async fn` items, `async` closures, and
/// any struct that implements `Fn`.
impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    fn into_handler(self) -> Next {
        Arc::new(FnHandler(self))
    }
}

/// Wraps a closure into a [`Next`]. This is what middleware stages use to
/// produce their wrapped handler.
pub fn handler_fn<F, Fut>(f: F) -> Next
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        Box::pin((self.0)(req))
    }
}
