use std::sync::Arc;

use crate::handler::{BoxHandler, Handler, box_handler};

/// A handler transformer. `wrap` is how a filter is put in front of a
/// handler; the result is again a handler.
pub trait Filter<B, H>: Send + Sync {
    type Handler: Handler<B>;

    fn wrap(&self, handler: H) -> Self::Handler;
}

/// Composes two filters so that `outer` runs around `inner`.
///
/// `then(then(a, b), c)` and `then(a, then(b, c))` wrap a handler into the
/// same `a(b(c(handler)))` chain.
pub fn then<F1, F2>(outer: F1, inner: F2) -> Then<F1, F2> {
    Then { outer, inner }
}

#[derive(Debug, Clone, Copy)]
pub struct Then<F1, F2> {
    outer: F1,
    inner: F2,
}

/// Method form of [`then`], so chains read `a.then(b).then(c)`.
///
/// Implemented for every filter in this crate. Own filter types opt in
/// with an empty `impl FilterExt for MyFilter {}`.
pub trait FilterExt: Sized {
    fn then<F>(self, inner: F) -> Then<Self, F> {
        then(self, inner)
    }
}

impl<F1, F2> FilterExt for Then<F1, F2> {}

impl FilterExt for Identity {}

impl<B> FilterExt for BoxFilter<B> {}

impl<B, H, F1, F2> Filter<B, H> for Then<F1, F2>
where
    F2: Filter<B, H>,
    F1: Filter<B, F2::Handler>,
{
    type Handler = F1::Handler;

    fn wrap(&self, handler: H) -> Self::Handler {
        self.outer.wrap(self.inner.wrap(handler))
    }
}

/// The filter that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<B, H: Handler<B>> Filter<B, H> for Identity {
    type Handler = H;

    fn wrap(&self, handler: H) -> Self::Handler {
        handler
    }
}

pub trait DynFilter<B>: Send + Sync {
    fn wrap(&self, handler: BoxHandler<B>) -> BoxHandler<B>;
}

struct FilterBox<T>(T);

impl<B, T> DynFilter<B> for FilterBox<T>
where
    T: Filter<B, BoxHandler<B>>,
    T::Handler: 'static,
    B: Send + 'static,
{
    fn wrap(&self, handler: BoxHandler<B>) -> BoxHandler<B> {
        box_handler(self.0.wrap(handler))
    }
}

/// A type erased filter over boxed handlers.
pub struct BoxFilter<B> {
    inner: Arc<dyn DynFilter<B>>,
}

impl<B> Clone for BoxFilter<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B> std::fmt::Debug for BoxFilter<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxFilter").finish_non_exhaustive()
    }
}

impl<B: Send + 'static> Filter<B, BoxHandler<B>> for BoxFilter<B> {
    type Handler = BoxHandler<B>;

    fn wrap(&self, handler: BoxHandler<B>) -> Self::Handler {
        self.inner.wrap(handler)
    }
}

pub fn box_filter<B, T>(filter: T) -> BoxFilter<B>
where
    T: Filter<B, BoxHandler<B>> + 'static,
    T::Handler: 'static,
    B: Send + 'static,
{
    BoxFilter {
        inner: Arc::new(FilterBox(filter)),
    }
}

/// Wraps `handler` in `filters`, the first filter ending up outermost.
pub fn compose<B>(filters: &[BoxFilter<B>], handler: BoxHandler<B>) -> BoxHandler<B>
where
    B: Send + 'static,
{
    filters
        .iter()
        .rev()
        .fold(handler, |handler, filter| filter.wrap(handler))
}
