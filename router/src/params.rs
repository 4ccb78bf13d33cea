use std::{borrow::Cow, collections::HashMap, sync::Arc};

use routing::Params;

/// Path parameters captured by the matched route. The router stores them in
/// the request extensions before the handler runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    inner: HashMap<Arc<str>, Arc<str>>,
}

impl UrlParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(|value| &**value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (&**k, &**v))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Params for UrlParams {
    fn set(&mut self, key: Cow<'_, str>, value: Cow<'_, str>) {
        self.inner.insert(Arc::from(key), Arc::from(value));
    }
}
