use std::{fmt, sync::Arc};

use futures::future::BoxFuture;
use http::{Method, Request, Response};
use routing::{MethodFilter, TemplateError, TrailingSlash, UriTemplate};
use tracing::{debug, trace};

use crate::{
    error::Error,
    filter::{BoxFilter, Filter, box_filter, compose},
    handler::{BoxHandler, Handler, NotFound, box_handler},
    options::RouterOptions,
    params::UrlParams,
};

/// A handler bound to a method filter and a path template.
pub struct Route<B> {
    method: MethodFilter,
    template: UriTemplate,
    handler: BoxHandler<B>,
}

impl<B> Route<B> {
    pub fn method(&self) -> MethodFilter {
        self.method
    }

    pub fn template(&self) -> &UriTemplate {
        &self.template
    }

    pub fn handler(&self) -> &BoxHandler<B> {
        &self.handler
    }
}

impl<B> Clone for Route<B> {
    fn clone(&self) -> Self {
        Route {
            method: self.method,
            template: self.template.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<B> fmt::Debug for Route<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template.to_string())
            .finish_non_exhaustive()
    }
}

/// Builds a standalone [`Route`]. Fails if `template` is malformed.
pub fn route<B, T>(method: MethodFilter, template: &str, handler: T) -> Result<Route<B>, TemplateError>
where
    T: Handler<B> + 'static,
    B: Send + 'static,
{
    Ok(Route {
        method,
        template: UriTemplate::parse(template)?,
        handler: box_handler(handler),
    })
}

/// Collects routes into a router with the default options.
pub fn routes<B, I>(routes: I) -> Router<B>
where
    I: IntoIterator<Item = Route<B>>,
    B: Default + Send + 'static,
{
    let mut builder = Builder::new();
    for route in routes {
        builder.add(route);
    }
    builder.build()
}

enum Entry<B> {
    Route(Route<B>),
    Mount { base: UriTemplate, router: Router<B> },
}

impl<B> Clone for Entry<B> {
    fn clone(&self) -> Self {
        match self {
            Entry::Route(route) => Entry::Route(route.clone()),
            Entry::Mount { base, router } => Entry::Mount {
                base: base.clone(),
                router: router.clone(),
            },
        }
    }
}

pub struct Builder<B> {
    entries: Vec<Entry<B>>,
    filters: Vec<BoxFilter<B>>,
    not_found: BoxHandler<B>,
    options: RouterOptions,
}

impl<B: Default + Send + 'static> Builder<B> {
    pub fn new() -> Builder<B> {
        Builder {
            entries: Vec::default(),
            filters: Vec::default(),
            not_found: box_handler(NotFound),
            options: RouterOptions::default(),
        }
    }
}

impl<B: Default + Send + 'static> Default for Builder<B> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<B: Send + 'static> Builder<B> {
    pub fn route<T>(
        &mut self,
        method: MethodFilter,
        template: &str,
        handler: T,
    ) -> Result<&mut Self, TemplateError>
    where
        T: Handler<B> + 'static,
    {
        let route = route(method, template, handler)?;
        Ok(self.add(route))
    }

    pub fn add(&mut self, route: Route<B>) -> &mut Self {
        debug!(method = ?route.method, template = %route.template, "route registered");
        self.entries.push(Entry::Route(route));
        self
    }

    pub fn get<T>(&mut self, template: &str, handler: T) -> Result<&mut Self, TemplateError>
    where
        T: Handler<B> + 'static,
    {
        self.route(MethodFilter::GET, template, handler)
    }

    pub fn post<T>(&mut self, template: &str, handler: T) -> Result<&mut Self, TemplateError>
    where
        T: Handler<B> + 'static,
    {
        self.route(MethodFilter::POST, template, handler)
    }

    pub fn put<T>(&mut self, template: &str, handler: T) -> Result<&mut Self, TemplateError>
    where
        T: Handler<B> + 'static,
    {
        self.route(MethodFilter::PUT, template, handler)
    }

    pub fn patch<T>(&mut self, template: &str, handler: T) -> Result<&mut Self, TemplateError>
    where
        T: Handler<B> + 'static,
    {
        self.route(MethodFilter::PATCH, template, handler)
    }

    pub fn delete<T>(&mut self, template: &str, handler: T) -> Result<&mut Self, TemplateError>
    where
        T: Handler<B> + 'static,
    {
        self.route(MethodFilter::DELETE, template, handler)
    }

    /// Registers a route that matches every method.
    pub fn any<T>(&mut self, template: &str, handler: T) -> Result<&mut Self, TemplateError>
    where
        T: Handler<B> + 'static,
    {
        self.route(MethodFilter::any(), template, handler)
    }

    /// Mounts `router` under `base`. The base is prepended to every template
    /// of the mounted router now; at request time a path that does not start
    /// with `base` skips the whole mount.
    ///
    /// The mounted router keeps its own filters and options. Its not-found
    /// handler is not consulted.
    pub fn mount(
        &mut self,
        base: &str,
        router: impl Into<Router<B>>,
    ) -> Result<&mut Self, TemplateError> {
        let base = UriTemplate::parse(base)?;
        let router = router.into().prefix(&base)?;
        debug!(base = %base, "router mounted");
        self.entries.push(Entry::Mount { base, router });
        Ok(self)
    }

    /// Appends all entries of `router`, as if they had been registered here.
    ///
    /// Unlike [`mount`](Builder::mount), the merged routes drop the options of
    /// `router` and are matched with the options of this builder. Filters
    /// already built into `router` stay on its routes; its not-found handler
    /// is not consulted.
    pub fn merge(&mut self, router: impl Into<Router<B>>) -> &mut Self {
        let router = router.into();
        self.entries.extend(router.entries.iter().cloned());
        self
    }

    /// Adds a filter around every route and the not-found handler. The first
    /// filter added ends up outermost.
    pub fn filter<F>(&mut self, filter: F) -> &mut Self
    where
        F: Filter<B, BoxHandler<B>> + 'static,
        F::Handler: 'static,
    {
        self.filters.push(box_filter(filter));
        self
    }

    pub fn not_found<T>(&mut self, handler: T) -> &mut Self
    where
        T: Handler<B> + 'static,
    {
        self.not_found = box_handler(handler);
        self
    }

    pub fn options(&mut self, options: RouterOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn trailing_slash(&mut self, policy: TrailingSlash) -> &mut Self {
        self.options.trailing_slash = policy;
        self
    }

    pub fn build(self) -> Router<B> {
        let filters = self.filters;
        let router = Router {
            entries: self.entries.into(),
            not_found: self.not_found,
            options: self.options,
        };

        if filters.is_empty() {
            router
        } else {
            router.map(&|handler| compose(&filters, handler))
        }
    }
}

impl<B: Send + 'static> From<Builder<B>> for Router<B> {
    fn from(value: Builder<B>) -> Self {
        value.build()
    }
}

/// An immutable table of routes and mounted routers. Cloning is shallow.
pub struct Router<B> {
    entries: Arc<[Entry<B>]>,
    not_found: BoxHandler<B>,
    options: RouterOptions,
}

impl<B> Clone for Router<B> {
    fn clone(&self) -> Self {
        Router {
            entries: self.entries.clone(),
            not_found: self.not_found.clone(),
            options: self.options,
        }
    }
}

impl<B> fmt::Debug for Router<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<B: Default + Send + 'static> Router<B> {
    pub fn builder() -> Builder<B> {
        Builder::new()
    }
}

impl<B> Router<B> {
    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// All routes, mounted ones included, in matching order.
    pub fn routes(&self) -> Vec<&Route<B>> {
        let mut out = Vec::new();
        self.collect_routes(&mut out);
        out
    }

    fn collect_routes<'a>(&'a self, out: &mut Vec<&'a Route<B>>) {
        for entry in self.entries.iter() {
            match entry {
                Entry::Route(route) => out.push(route),
                Entry::Mount { router, .. } => router.collect_routes(out),
            }
        }
    }

    /// Resolves `method` and `path` to a handler. Never fails: when nothing
    /// matches, the not-found handler is returned.
    pub fn match_route(&self, method: &Method, path: &str) -> RouteMatch<'_, B> {
        let mut candidates = 0;
        match self.find(method, path, &mut candidates) {
            Some((route, params)) => RouteMatch {
                handler: &route.handler,
                params,
                template: Some(&route.template),
                candidates,
            },
            None => RouteMatch {
                handler: &self.not_found,
                params: UrlParams::default(),
                template: None,
                candidates,
            },
        }
    }

    fn find<'a>(
        &'a self,
        method: &Method,
        path: &str,
        candidates: &mut usize,
    ) -> Option<(&'a Route<B>, UrlParams)> {
        for entry in self.entries.iter() {
            match entry {
                Entry::Route(route) => {
                    if !route.method.matches(method) {
                        continue;
                    }

                    *candidates += 1;
                    let mut params = UrlParams::default();
                    if route
                        .template
                        .match_path(path, self.options.trailing_slash, &mut params)
                    {
                        return Some((route, params));
                    }
                }
                Entry::Mount { base, router } => {
                    if !base.match_prefix(path, &mut ()) {
                        trace!(base = %base, path, "skipping mount");
                        continue;
                    }

                    if let Some(found) = router.find(method, path, candidates) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }
}

impl<B: Send + 'static> Router<B> {
    /// Returns a router with `base` prepended to every template, mounted
    /// routers included.
    pub fn with_base_path(self, base: &str) -> Result<Router<B>, TemplateError> {
        self.prefix(&UriTemplate::parse(base)?)
    }

    /// Returns a router whose routes and not-found handler are all wrapped in
    /// `filter`. Which route matches a request does not change.
    pub fn with_filter<F>(self, filter: F) -> Router<B>
    where
        F: Filter<B, BoxHandler<B>> + 'static,
        F::Handler: 'static,
    {
        let filter = box_filter(filter);
        self.map(&|handler| filter.wrap(handler))
    }

    fn prefix(self, base: &UriTemplate) -> Result<Router<B>, TemplateError> {
        if base.has_rest() {
            return Err(TemplateError::RestInBasePath {
                template: base.to_string(),
            });
        }

        let entries = self
            .entries
            .iter()
            .map(|entry| -> Result<Entry<B>, TemplateError> {
                Ok(match entry {
                    Entry::Route(route) => Entry::Route(Route {
                        method: route.method,
                        template: base.join(&route.template)?,
                        handler: route.handler.clone(),
                    }),
                    Entry::Mount {
                        base: inner,
                        router,
                    } => Entry::Mount {
                        base: base.join(inner)?,
                        router: router.clone().prefix(base)?,
                    },
                })
            })
            .collect::<Result<Arc<[_]>, _>>()?;

        Ok(Router {
            entries,
            not_found: self.not_found,
            options: self.options,
        })
    }

    fn map(self, func: &dyn Fn(BoxHandler<B>) -> BoxHandler<B>) -> Router<B> {
        let entries = self
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Route(route) => Entry::Route(Route {
                    method: route.method,
                    template: route.template.clone(),
                    handler: func(route.handler.clone()),
                }),
                Entry::Mount { base, router } => Entry::Mount {
                    base: base.clone(),
                    router: router.clone().map(func),
                },
            })
            .collect();

        Router {
            entries,
            not_found: func(self.not_found),
            options: self.options,
        }
    }
}

/// The outcome of [`Router::match_route`].
pub struct RouteMatch<'a, B> {
    handler: &'a BoxHandler<B>,
    params: UrlParams,
    template: Option<&'a UriTemplate>,
    candidates: usize,
}

impl<'a, B> RouteMatch<'a, B> {
    pub fn is_found(&self) -> bool {
        self.template.is_some()
    }

    pub fn handler(&self) -> &'a BoxHandler<B> {
        self.handler
    }

    pub fn params(&self) -> &UrlParams {
        &self.params
    }

    /// The template of the matched route, `None` when not found.
    pub fn template(&self) -> Option<&'a UriTemplate> {
        self.template
    }

    pub fn into_parts(self) -> (&'a BoxHandler<B>, UrlParams) {
        (self.handler, self.params)
    }
}

impl<B: Send + 'static> Handler<B> for Router<B> {
    type Response = Response<B>;

    type Future<'a>
        = BoxFuture<'a, Result<Self::Response, Error>>
    where
        Self: 'a;

    fn call<'a>(&'a self, mut req: Request<B>) -> Self::Future<'a> {
        let found = self.match_route(req.method(), req.uri().path());

        match found.template {
            Some(template) => trace!(
                method = %req.method(),
                path = req.uri().path(),
                template = %template,
                candidates = found.candidates,
                "route matched"
            ),
            None => trace!(
                method = %req.method(),
                path = req.uri().path(),
                candidates = found.candidates,
                "no route matched"
            ),
        }

        let (handler, params) = found.into_parts();
        req.extensions_mut().insert(params);
        handler.call(req)
    }
}
