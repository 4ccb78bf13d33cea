use std::sync::Arc;

use futures::future::BoxFuture;
use http::{Request, Response, StatusCode};
use tracing::error;

use crate::{
    error::Error,
    filter::{Filter, FilterExt},
    handler::Handler,
    into_response::IntoResponse,
};

/// Turns handler failures into `500 Internal Server Error` responses.
///
/// Nothing below this filter is allowed to fail the request. Put it
/// outermost to cover every other filter as well.
pub fn catch_all<B: Default>() -> CatchAll<fn(Error) -> Response<B>> {
    CatchAll {
        recover: Arc::new(internal_error::<B> as fn(Error) -> Response<B>),
    }
}

/// Like [`catch_all`], with a custom function building the response.
pub fn catch_all_with<F>(recover: F) -> CatchAll<F> {
    CatchAll {
        recover: Arc::new(recover),
    }
}

fn internal_error<B: Default>(_error: Error) -> Response<B> {
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

pub struct CatchAll<F> {
    recover: Arc<F>,
}

impl<F> Clone for CatchAll<F> {
    fn clone(&self) -> Self {
        CatchAll {
            recover: self.recover.clone(),
        }
    }
}

impl<B, H, F> Filter<B, H> for CatchAll<F>
where
    H: Handler<B>,
    F: Fn(Error) -> Response<B> + Send + Sync,
    B: Send + 'static,
{
    type Handler = CatchAllHandler<H, F>;

    fn wrap(&self, handler: H) -> Self::Handler {
        CatchAllHandler {
            inner: handler,
            recover: self.recover.clone(),
        }
    }
}

impl<F> FilterExt for CatchAll<F> {}

pub struct CatchAllHandler<H, F> {
    inner: H,
    recover: Arc<F>,
}

impl<B, H, F> Handler<B> for CatchAllHandler<H, F>
where
    H: Handler<B>,
    F: Fn(Error) -> Response<B> + Send + Sync,
    B: Send + 'static,
{
    type Response = Response<B>;

    type Future<'a>
        = BoxFuture<'a, Result<Self::Response, Error>>
    where
        Self: 'a;

    fn call<'a>(&'a self, req: Request<B>) -> Self::Future<'a> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        Box::pin(async move {
            match self.inner.call(req).await {
                Ok(resp) => Ok(resp.into_response()),
                Err(err) => {
                    error!(%method, %path, error = %err, "request failed");
                    Ok((self.recover)(err))
                }
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use bytes::Bytes;

    use crate::handler_fn::handler_fn;

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    fn failing() -> impl Handler<Bytes, Response = Response<Bytes>> {
        handler_fn(|_req: Request<Bytes>| async move { Err::<Response<Bytes>, _>(Boom) })
    }

    #[tokio::test]
    async fn failures_become_500() {
        let handler = catch_all::<Bytes>().wrap(failing());
        let resp = handler
            .call(Request::new(Bytes::new()))
            .await
            .expect("response");

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.body().is_empty());
    }

    #[tokio::test]
    async fn custom_recovery_sees_the_error() {
        let handler = catch_all_with(|err: Error| -> Response<Bytes> {
            let status = if err.is::<Boom>() {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, err.to_string()).into_response()
        })
        .wrap(failing());

        let resp = handler
            .call(Request::new(Bytes::new()))
            .await
            .expect("response");

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.body(), &Bytes::from("boom"));
    }

    #[tokio::test]
    async fn without_the_filter_failures_propagate() {
        let err = failing()
            .call(Request::new(Bytes::new()))
            .await
            .expect_err("failure");

        assert!(err.is::<Boom>());
    }
}
