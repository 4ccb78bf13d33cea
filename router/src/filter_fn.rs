use std::sync::Arc;

use futures::TryFuture;
use http::{Request, Response};

use crate::error::{BoxError, Error};
use crate::filter::{Filter, FilterExt};
use crate::handler::{BoxHandler, Handler, box_handler};
use crate::handler_fn::HandlerFnFuture;
use crate::into_response::IntoResponse;

/// The rest of the chain, as seen from inside a [`filter_fn`] closure.
pub struct Next<B> {
    handler: BoxHandler<B>,
}

impl<B> Clone for Next<B> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
        }
    }
}

impl<B: Send + 'static> Next<B> {
    pub fn new(handler: BoxHandler<B>) -> Next<B> {
        Next { handler }
    }

    pub async fn run(self, req: Request<B>) -> Result<Response<B>, Error> {
        self.handler.call(req).await
    }
}

/// Builds a filter from an async closure that receives the request and the
/// rest of the chain. Code before `next.run(req)` runs on the way in, code
/// after it on the way out; not calling `next` short-circuits the chain.
///
/// ```
/// use switchyard::{Error, Next, Request, filter_fn};
/// use switchyard::bytes::Bytes;
///
/// let server_header = filter_fn(|req: Request<Bytes>, next: Next<Bytes>| async move {
///     let mut resp = next.run(req).await?;
///     resp.headers_mut().insert("server", "switchyard".parse().unwrap());
///     Ok::<_, Error>(resp)
/// });
/// # let _ = server_header;
/// ```
pub fn filter_fn<T>(func: T) -> FilterFn<T> {
    FilterFn(Arc::new(func))
}

pub struct FilterFn<T>(Arc<T>);

impl<T> Clone for FilterFn<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T, B, H, U> Filter<B, H> for FilterFn<T>
where
    T: Fn(Request<B>, Next<B>) -> U + Send + Sync + 'static,
    U: TryFuture + Send,
    U::Ok: IntoResponse<B>,
    U::Error: Into<BoxError>,
    H: Handler<B> + 'static,
    B: Send + 'static,
{
    type Handler = FilterFnHandler<T, B>;

    fn wrap(&self, handler: H) -> Self::Handler {
        FilterFnHandler {
            func: self.0.clone(),
            next: Next::new(box_handler(handler)),
        }
    }
}

impl<T> FilterExt for FilterFn<T> {}

pub struct FilterFnHandler<T, B> {
    func: Arc<T>,
    next: Next<B>,
}

impl<T, B, U> Handler<B> for FilterFnHandler<T, B>
where
    T: Fn(Request<B>, Next<B>) -> U + Send + Sync,
    U: TryFuture + Send,
    U::Ok: IntoResponse<B>,
    U::Error: Into<BoxError>,
    B: Send + 'static,
{
    type Response = U::Ok;

    type Future<'a>
        = HandlerFnFuture<U>
    where
        Self: 'a;

    fn call<'a>(&'a self, req: Request<B>) -> Self::Future<'a> {
        HandlerFnFuture::new((self.func)(req, self.next.clone()))
    }
}

/// Builds a filter from a plain `handler -> handler` function.
pub fn wrap_fn<T>(func: T) -> WrapFn<T> {
    WrapFn(func)
}

#[derive(Clone, Copy)]
pub struct WrapFn<T>(T);

impl<T, B, H, U> Filter<B, H> for WrapFn<T>
where
    T: Fn(H) -> U + Send + Sync,
    U: Handler<B>,
{
    type Handler = U;

    fn wrap(&self, handler: H) -> Self::Handler {
        (self.0)(handler)
    }
}

impl<T> FilterExt for WrapFn<T> {}
