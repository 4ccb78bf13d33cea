use core::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failure raised by a handler or filter. Passed up the filter chain
/// untouched until something explicitly turns it into a response.
#[derive(Debug)]
pub struct Error {
    inner: BoxError,
}

impl Error {
    pub fn new<T: Into<BoxError>>(error: T) -> Error {
        match error.into().downcast::<Error>() {
            Ok(error) => *error,
            Err(inner) => Error { inner },
        }
    }

    pub fn is<T: std::error::Error + 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: std::error::Error + 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

// Display already shows the inner error, so the chain continues below it.
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl From<routing::TemplateError> for Error {
    fn from(value: routing::TemplateError) -> Self {
        Error::new(value)
    }
}

impl From<http::Error> for Error {
    fn from(value: http::Error) -> Self {
        Error::new(value)
    }
}

impl From<BoxError> for Error {
    fn from(value: BoxError) -> Self {
        Error::new(value)
    }
}
