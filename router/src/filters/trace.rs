use std::time::Instant;

use futures::future::BoxFuture;
use http::{Request, Response};
use tracing::{Instrument, debug, info_span, warn};

use crate::{
    error::Error,
    filter::{Filter, FilterExt},
    handler::Handler,
    into_response::IntoResponse,
};

/// Logs every request that passes through: a span with the method and path,
/// the status and elapsed time on success, the error on failure. Failures
/// are passed on unchanged.
pub fn trace() -> Trace {
    Trace
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl<B, H> Filter<B, H> for Trace
where
    H: Handler<B>,
    B: Send + 'static,
{
    type Handler = TraceHandler<H>;

    fn wrap(&self, handler: H) -> Self::Handler {
        TraceHandler { inner: handler }
    }
}

impl FilterExt for Trace {}

#[derive(Debug, Clone)]
pub struct TraceHandler<H> {
    inner: H,
}

impl<B, H> Handler<B> for TraceHandler<H>
where
    H: Handler<B>,
    B: Send + 'static,
{
    type Response = Response<B>;

    type Future<'a>
        = BoxFuture<'a, Result<Self::Response, Error>>
    where
        Self: 'a;

    fn call<'a>(&'a self, req: Request<B>) -> Self::Future<'a> {
        let span = info_span!("request", method = %req.method(), path = req.uri().path());

        Box::pin(
            async move {
                let start = Instant::now();
                match self.inner.call(req).await {
                    Ok(resp) => {
                        let resp = resp.into_response();
                        debug!(
                            status = resp.status().as_u16(),
                            elapsed = ?start.elapsed(),
                            "request finished"
                        );
                        Ok(resp)
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed = ?start.elapsed(), "request failed");
                        Err(err)
                    }
                }
            }
            .instrument(span),
        )
    }
}
