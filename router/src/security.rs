//! Endpoint security, expressed as filters put in front of the endpoints
//! they protect.

use std::{fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use http::{
    HeaderName, HeaderValue, Method, Request, Response, StatusCode,
    header::{AUTHORIZATION, InvalidHeaderValue, WWW_AUTHENTICATE},
};
use tracing::debug;
use url::form_urlencoded;

use crate::{
    filter::{BoxFilter, Identity, box_filter},
    filter_fn::{Next, filter_fn},
    into_response::IntoResponse,
};

/// Supplies the filter applied to every request of a protected endpoint.
pub trait Security<B>: Send + Sync {
    fn filter(&self) -> BoxFilter<B>;
}

/// Lets all traffic through.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSecurity;

impl<B: Send + 'static> Security<B> for NoSecurity {
    fn filter(&self) -> BoxFilter<B> {
        box_filter(Identity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    Header(HeaderName),
    Query(String),
}

/// Requires an api key, read from a header or a query parameter and checked
/// by a predicate. Requests without a valid key get `401 Unauthorized`.
#[derive(Clone)]
pub struct ApiKeySecurity {
    source: ApiKeySource,
    validate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
    authorize_options_requests: bool,
}

impl ApiKeySecurity {
    pub fn new<F>(source: ApiKeySource, validate: F) -> ApiKeySecurity
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        ApiKeySecurity {
            source,
            validate: Arc::new(validate),
            authorize_options_requests: true,
        }
    }

    pub fn header<F>(name: HeaderName, validate: F) -> ApiKeySecurity
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        ApiKeySecurity::new(ApiKeySource::Header(name), validate)
    }

    pub fn query<F>(name: impl Into<String>, validate: F) -> ApiKeySecurity
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        ApiKeySecurity::new(ApiKeySource::Query(name.into()), validate)
    }

    /// When `false`, `OPTIONS` requests pass without a key. Defaults to `true`.
    pub fn authorize_options_requests(mut self, authorize: bool) -> Self {
        self.authorize_options_requests = authorize;
        self
    }

    fn key<B>(&self, req: &Request<B>) -> Option<String> {
        match &self.source {
            ApiKeySource::Header(name) => req
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            ApiKeySource::Query(name) => {
                form_urlencoded::parse(req.uri().query()?.as_bytes())
                    .find(|(key, _)| key == name.as_str())
                    .map(|(_, value)| value.into_owned())
            }
        }
    }

    fn allows<B>(&self, req: &Request<B>) -> bool {
        if !self.authorize_options_requests && req.method() == Method::OPTIONS {
            return true;
        }

        self.key(req)
            .map(|key| (self.validate)(&key))
            .unwrap_or_default()
    }
}

impl fmt::Debug for ApiKeySecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeySecurity")
            .field("source", &self.source)
            .field("authorize_options_requests", &self.authorize_options_requests)
            .finish_non_exhaustive()
    }
}

impl<B: Default + Send + 'static> Security<B> for ApiKeySecurity {
    fn filter(&self) -> BoxFilter<B> {
        let security = self.clone();

        box_filter(filter_fn(move |req: Request<B>, next: Next<B>| {
            let allowed = security.allows(&req);
            async move {
                if allowed {
                    next.run(req).await
                } else {
                    debug!(path = req.uri().path(), "missing or invalid api key");
                    Ok(StatusCode::UNAUTHORIZED.into_response())
                }
            }
        }))
    }
}

/// A user name and password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Credentials {
        Credentials {
            user: user.into(),
            password: password.into(),
        }
    }

    /// The value of an `Authorization` header carrying these credentials.
    pub fn basic_auth_header(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.user, self.password))
        )
    }

    fn from_basic_auth_header(value: &str) -> Option<Credentials> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
        let (user, password) = decoded.split_once(':')?;
        Some(Credentials::new(user, password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Requires `Authorization: Basic` credentials. Failing requests get
/// `401 Unauthorized` with a `WWW-Authenticate` challenge for the realm.
#[derive(Clone)]
pub struct BasicAuthSecurity {
    challenge: HeaderValue,
    check: Arc<dyn Fn(&Credentials) -> bool + Send + Sync>,
}

impl BasicAuthSecurity {
    pub fn new(realm: &str, credentials: Credentials) -> Result<BasicAuthSecurity, InvalidHeaderValue> {
        BasicAuthSecurity::with_check(realm, move |given| *given == credentials)
    }

    pub fn with_check<F>(realm: &str, check: F) -> Result<BasicAuthSecurity, InvalidHeaderValue>
    where
        F: Fn(&Credentials) -> bool + Send + Sync + 'static,
    {
        Ok(BasicAuthSecurity {
            challenge: HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))?,
            check: Arc::new(check),
        })
    }

    fn allows<B>(&self, req: &Request<B>) -> bool {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Credentials::from_basic_auth_header)
            .map(|credentials| (self.check)(&credentials))
            .unwrap_or_default()
    }
}

impl fmt::Debug for BasicAuthSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthSecurity")
            .field("challenge", &self.challenge)
            .finish_non_exhaustive()
    }
}

impl<B: Default + Send + 'static> Security<B> for BasicAuthSecurity {
    fn filter(&self) -> BoxFilter<B> {
        let security = self.clone();

        box_filter(filter_fn(move |req: Request<B>, next: Next<B>| {
            let allowed = security.allows(&req);
            let challenge = security.challenge.clone();
            async move {
                if allowed {
                    next.run(req).await
                } else {
                    debug!(path = req.uri().path(), "basic auth rejected");
                    let mut resp: Response<B> = StatusCode::UNAUTHORIZED.into_response();
                    resp.headers_mut().insert(WWW_AUTHENTICATE, challenge);
                    Ok(resp)
                }
            }
        }))
    }
}
