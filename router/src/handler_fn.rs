use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{TryFuture, TryFutureExt, ready};
use http::Request;
use pin_project_lite::pin_project;

use crate::error::{BoxError, Error};
use crate::handler::Handler;
use crate::into_response::IntoResponse;

/// Turns an async closure into a [`Handler`].
///
/// ```
/// use switchyard::{Error, Request, Response, handler_fn};
/// use switchyard::bytes::Bytes;
///
/// let hello = handler_fn(|_req: Request<Bytes>| async move {
///     Ok::<_, Error>(Response::new(Bytes::from("hello")))
/// });
/// # let _ = hello;
/// ```
pub fn handler_fn<T>(func: T) -> HandlerFn<T> {
    HandlerFn(func)
}

#[derive(Clone, Copy)]
pub struct HandlerFn<T>(T);

impl<T, B, U> Handler<B> for HandlerFn<T>
where
    T: Fn(Request<B>) -> U + Send + Sync,
    U: TryFuture + Send,
    U::Ok: IntoResponse<B>,
    U::Error: Into<BoxError>,
{
    type Response = U::Ok;

    type Future<'a>
        = HandlerFnFuture<U>
    where
        Self: 'a;

    fn call<'a>(&'a self, req: Request<B>) -> Self::Future<'a> {
        HandlerFnFuture::new((self.0)(req))
    }
}

pin_project! {
    pub struct HandlerFnFuture<U> {
        #[pin]
        future: futures::future::IntoFuture<U>,
    }
}

impl<U: TryFuture> HandlerFnFuture<U> {
    pub(crate) fn new(future: U) -> HandlerFnFuture<U> {
        HandlerFnFuture {
            future: <U as TryFutureExt>::into_future(future),
        }
    }
}

impl<U> Future for HandlerFnFuture<U>
where
    U: TryFuture,
    U::Error: Into<BoxError>,
{
    type Output = Result<U::Ok, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let ret = ready!(this.future.poll(cx));
        Poll::Ready(ret.map_err(Error::new))
    }
}
