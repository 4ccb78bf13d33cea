mod error;
mod filter;
mod filter_fn;
mod handler;
mod handler_fn;
mod http_ext;
mod into_response;
mod options;
mod params;
mod router;
#[cfg(feature = "tower")]
mod service;

pub mod filters;
pub mod security;

#[cfg(feature = "tower")]
pub use self::service::{HandlerService, IntoHandlerExt, ServiceHandler};
pub use self::{
    error::{BoxError, Error},
    filter::{
        BoxFilter, DynFilter, Filter, FilterExt, Identity, Then, box_filter, compose, then,
    },
    filter_fn::{FilterFn, FilterFnHandler, Next, WrapFn, filter_fn, wrap_fn},
    handler::{BoxHandler, DynHandler, Handler, NotFound, box_handler},
    handler_fn::{HandlerFn, HandlerFnFuture, handler_fn},
    http_ext::{RequestExt, ResponseExt, request, response},
    into_response::IntoResponse,
    options::RouterOptions,
    params::UrlParams,
    router::{Builder, Route, RouteMatch, Router, route, routes},
};

pub use routing::{MethodFilter, Params, TemplateError, TrailingSlash, UriTemplate};

pub use bytes;
pub use http::{
    HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode, header,
};
