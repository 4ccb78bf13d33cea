use http::{
    HeaderName, HeaderValue, Method, Request, Response, StatusCode, Uri, header::AsHeaderName,
    uri::PathAndQuery,
};
use url::form_urlencoded;

use crate::params::UrlParams;

/// An empty request, e.g. `request::<Bytes>(Method::GET, "/")`.
pub fn request<B: Default>(method: Method, uri: &str) -> Result<Request<B>, http::Error> {
    Request::builder().method(method).uri(uri).body(B::default())
}

/// An empty response with the given status.
pub fn response<B: Default>(status: StatusCode) -> Response<B> {
    let mut resp = Response::new(B::default());
    *resp.status_mut() = status;
    resp
}

/// With-style accessors and mutators on [`Request`]. Mutators take the
/// request by value and hand back the modified one.
pub trait RequestExt<B>: Sized {
    fn with_method(self, method: Method) -> Self;

    /// Appends a header, keeping any existing values of the same name.
    fn with_header<K, V>(self, name: K, value: V) -> Result<Self, http::Error>
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>;

    fn with_body<T>(self, body: T) -> Request<T>;

    /// Appends a form-url-encoded query parameter to the uri.
    fn with_query(self, name: &str, value: &str) -> Result<Self, http::Error>;

    /// First value of the query parameter `name`, decoded.
    fn query(&self, name: &str) -> Option<String>;

    fn queries(&self, name: &str) -> Vec<String>;

    fn header<K: AsHeaderName>(&self, name: K) -> Option<&str>;

    /// A value captured by the matched route template.
    fn path_param(&self, name: &str) -> Option<&str>;

    fn body_string(&self) -> String
    where
        B: AsRef<[u8]>;
}

impl<B> RequestExt<B> for Request<B> {
    fn with_method(mut self, method: Method) -> Self {
        *self.method_mut() = method;
        self
    }

    fn with_header<K, V>(mut self, name: K, value: V) -> Result<Self, http::Error>
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        let name = HeaderName::try_from(name).map_err(Into::into)?;
        let value = HeaderValue::try_from(value).map_err(Into::into)?;
        self.headers_mut().append(name, value);
        Ok(self)
    }

    fn with_body<T>(self, body: T) -> Request<T> {
        self.map(|_| body)
    }

    fn with_query(mut self, name: &str, value: &str) -> Result<Self, http::Error> {
        let query = form_urlencoded::Serializer::new(self.uri().query().unwrap_or_default().to_string())
            .append_pair(name, value)
            .finish();

        let path_and_query: PathAndQuery = format!("{}?{}", self.uri().path(), query).parse()?;

        let mut parts = self.uri().clone().into_parts();
        parts.path_and_query = Some(path_and_query);
        *self.uri_mut() = Uri::from_parts(parts)?;

        Ok(self)
    }

    fn query(&self, name: &str) -> Option<String> {
        let query = self.uri().query()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    fn queries(&self, name: &str) -> Vec<String> {
        let Some(query) = self.uri().query() else {
            return Vec::new();
        };

        form_urlencoded::parse(query.as_bytes())
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .collect()
    }

    fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers().get(name).and_then(|value| value.to_str().ok())
    }

    fn path_param(&self, name: &str) -> Option<&str> {
        self.extensions().get::<UrlParams>()?.get(name)
    }

    fn body_string(&self) -> String
    where
        B: AsRef<[u8]>,
    {
        String::from_utf8_lossy(self.body().as_ref()).into_owned()
    }
}

/// With-style accessors and mutators on [`Response`].
pub trait ResponseExt<B>: Sized {
    fn with_status(self, status: StatusCode) -> Self;

    /// Appends a header, keeping any existing values of the same name.
    fn with_header<K, V>(self, name: K, value: V) -> Result<Self, http::Error>
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>;

    fn with_body<T>(self, body: T) -> Response<T>;

    fn header<K: AsHeaderName>(&self, name: K) -> Option<&str>;

    /// The canonical reason phrase of the status, if it has one.
    fn reason(&self) -> Option<&'static str>;

    fn body_string(&self) -> String
    where
        B: AsRef<[u8]>;
}

impl<B> ResponseExt<B> for Response<B> {
    fn with_status(mut self, status: StatusCode) -> Self {
        *self.status_mut() = status;
        self
    }

    fn with_header<K, V>(mut self, name: K, value: V) -> Result<Self, http::Error>
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        let name = HeaderName::try_from(name).map_err(Into::into)?;
        let value = HeaderValue::try_from(value).map_err(Into::into)?;
        self.headers_mut().append(name, value);
        Ok(self)
    }

    fn with_body<T>(self, body: T) -> Response<T> {
        self.map(|_| body)
    }

    fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers().get(name).and_then(|value| value.to_str().ok())
    }

    fn reason(&self) -> Option<&'static str> {
        self.status().canonical_reason()
    }

    fn body_string(&self) -> String
    where
        B: AsRef<[u8]>,
    {
        String::from_utf8_lossy(self.body().as_ref()).into_owned()
    }
}
