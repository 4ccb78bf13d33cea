use std::{
    sync::Arc,
    task::{Context, Poll},
};

use futures::future::BoxFuture;
use http::{Request, Response};
use tower::{Service, ServiceExt as _};

use crate::{
    error::{BoxError, Error},
    handler::Handler,
    into_response::IntoResponse,
    router::Router,
};

/// Exposes a [`Handler`] as a [`tower::Service`], which is what the server
/// integration consumes.
pub struct HandlerService<H> {
    handler: Arc<H>,
}

impl<H> HandlerService<H> {
    pub fn new(handler: H) -> HandlerService<H> {
        HandlerService {
            handler: Arc::new(handler),
        }
    }
}

impl<H> Clone for HandlerService<H> {
    fn clone(&self) -> Self {
        HandlerService {
            handler: self.handler.clone(),
        }
    }
}

impl<B, H> Service<Request<B>> for HandlerService<H>
where
    H: Handler<B> + 'static,
    B: Send + 'static,
{
    type Response = Response<B>;

    type Error = Error;

    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let handler = self.handler.clone();
        Box::pin(async move { handler.call(req).await.map(|resp| resp.into_response()) })
    }
}

impl<B: Send + 'static> Router<B> {
    pub fn into_service(self) -> HandlerService<Router<B>> {
        HandlerService::new(self)
    }
}

pub trait IntoHandlerExt<R>: Service<R> {
    /// Uses the service as a [`Handler`], e.g. to route to an existing
    /// tower stack. Every request is sent to a fresh clone.
    fn into_handler(self) -> ServiceHandler<Self>
    where
        Self: Sized,
    {
        ServiceHandler(self)
    }
}

impl<R, T> IntoHandlerExt<R> for T where T: Service<R> {}

#[derive(Debug, Clone)]
pub struct ServiceHandler<T>(T);

impl<T, B> Handler<B> for ServiceHandler<T>
where
    T: Service<Request<B>> + Clone + Send + Sync,
    T::Future: Send,
    T::Error: Into<BoxError>,
    T::Response: IntoResponse<B>,
    B: Send + 'static,
{
    type Response = Response<B>;

    type Future<'a>
        = BoxFuture<'a, Result<Self::Response, Error>>
    where
        Self: 'a;

    fn call<'a>(&'a self, req: Request<B>) -> Self::Future<'a> {
        let service = self.0.clone();
        Box::pin(async move {
            Ok(service
                .oneshot(req)
                .await
                .map_err(Error::new)?
                .into_response())
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::convert::Infallible;

    use bytes::Bytes;
    use http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::{handler_fn::handler_fn, http_ext::request, router::Builder};

    #[tokio::test]
    async fn routers_serve_as_tower_services() {
        let mut builder = Builder::<Bytes>::new();
        builder
            .get("/ping", handler_fn(|_req: Request<Bytes>| async move {
                Ok::<_, Error>("pong")
            }))
            .expect("route");

        let service = builder.build().into_service();

        let resp = service
            .clone()
            .oneshot(request(Method::GET, "/ping").expect("request"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), &Bytes::from("pong"));

        let resp = service
            .oneshot(request(Method::GET, "/pong").expect("request"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn tower_services_serve_as_handlers() {
        let service = tower::service_fn(|req: Request<Bytes>| async move {
            Ok::<_, Infallible>(Response::new(Bytes::from(req.uri().path().to_string())))
        });

        let mut builder = Builder::<Bytes>::new();
        builder
            .any("/legacy/{rest...}", service.into_handler())
            .expect("route");
        let router = builder.build();

        let resp = router
            .call(request(Method::DELETE, "/legacy/a/b").expect("request"))
            .await
            .expect("response");
        assert_eq!(resp.body(), &Bytes::from("/legacy/a/b"));
    }
}
