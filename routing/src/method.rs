use http::Method;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct MethodFilter: u16 {
        const GET = 1 << 0;
        const POST = 1 << 1;
        const PUT = 1 << 2;
        const PATCH = 1 << 3;
        const DELETE = 1 << 4;
        const HEAD = 1 << 5;
        const OPTIONS = 1 << 6;
        const TRACE = 1 << 7;
        const CONNECT = 1 << 8;
        /// Any method outside the standard set, e.g. `PURGE`.
        const EXTENSION = 1 << 9;
    }
}

impl MethodFilter {
    /// Matches every method, including extension methods.
    pub fn any() -> MethodFilter {
        MethodFilter::all()
    }

    pub fn is_any(&self) -> bool {
        self.is_all()
    }

    pub fn matches(&self, method: &Method) -> bool {
        self.is_any() || self.contains(MethodFilter::from(method))
    }
}

impl From<&Method> for MethodFilter {
    fn from(value: &Method) -> Self {
        match *value {
            Method::GET => MethodFilter::GET,
            Method::POST => MethodFilter::POST,
            Method::PATCH => MethodFilter::PATCH,
            Method::PUT => MethodFilter::PUT,
            Method::DELETE => MethodFilter::DELETE,
            Method::HEAD => MethodFilter::HEAD,
            Method::OPTIONS => MethodFilter::OPTIONS,
            Method::TRACE => MethodFilter::TRACE,
            Method::CONNECT => MethodFilter::CONNECT,
            _ => MethodFilter::EXTENSION,
        }
    }
}

impl From<Method> for MethodFilter {
    fn from(value: Method) -> Self {
        MethodFilter::from(&value)
    }
}
