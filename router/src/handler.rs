use std::sync::Arc;

use futures::future::BoxFuture;
use http::{Request, Response, StatusCode};

use crate::{error::Error, into_response::IntoResponse};

/// The terminal unit of dispatch: a request in, a response out.
pub trait Handler<B>: Send + Sync {
    type Response: IntoResponse<B>;
    type Future<'a>: Future<Output = Result<Self::Response, Error>> + Send
    where
        Self: 'a;

    fn call<'a>(&'a self, req: Request<B>) -> Self::Future<'a>;
}

pub trait DynHandler<B>: Send + Sync {
    fn call<'a>(&'a self, req: Request<B>) -> BoxFuture<'a, Result<Response<B>, Error>>;
}

pub fn box_handler<B, T>(handler: T) -> BoxHandler<B>
where
    T: Handler<B> + 'static,
    B: Send + 'static,
{
    BoxHandler {
        inner: Arc::new(HandlerBox(handler)),
    }
}

struct HandlerBox<T>(T);

impl<B, T> DynHandler<B> for HandlerBox<T>
where
    T: Handler<B>,
    B: Send + 'static,
{
    fn call<'a>(&'a self, req: Request<B>) -> BoxFuture<'a, Result<Response<B>, Error>> {
        Box::pin(async move { self.0.call(req).await.map(|m| m.into_response()) })
    }
}

/// A type erased, reference counted handler. Cloning is cheap.
pub struct BoxHandler<B> {
    inner: Arc<dyn DynHandler<B>>,
}

impl<B: Send + 'static> Handler<B> for BoxHandler<B> {
    type Response = Response<B>;

    type Future<'a>
        = BoxFuture<'a, Result<Self::Response, Error>>
    where
        Self: 'a;

    fn call<'a>(&'a self, req: Request<B>) -> Self::Future<'a> {
        self.inner.call(req)
    }
}

impl<B> Clone for BoxHandler<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B> std::fmt::Debug for BoxHandler<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxHandler").finish_non_exhaustive()
    }
}

/// Answers every request with `404 Not Found` and an empty body.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl<B: Default + Send> Handler<B> for NotFound {
    type Response = Response<B>;

    type Future<'a> = std::future::Ready<Result<Self::Response, Error>>;

    fn call<'a>(&'a self, _req: Request<B>) -> Self::Future<'a> {
        std::future::ready(Ok(StatusCode::NOT_FOUND.into_response()))
    }
}
