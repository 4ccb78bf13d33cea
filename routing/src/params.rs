use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
};

/// Sink for values captured by template placeholders.
pub trait Params {
    fn set(&mut self, key: Cow<'_, str>, value: Cow<'_, str>);
}

impl Params for BTreeMap<String, String> {
    fn set(&mut self, key: Cow<'_, str>, value: Cow<'_, str>) {
        self.insert(key.into_owned(), value.into_owned());
    }
}

impl Params for HashMap<String, String> {
    fn set(&mut self, key: Cow<'_, str>, value: Cow<'_, str>) {
        self.insert(key.into_owned(), value.into_owned());
    }
}

impl Params for () {
    fn set(&mut self, _key: Cow<'_, str>, _value: Cow<'_, str>) {}
}

impl<P: Params + ?Sized> Params for &mut P {
    fn set(&mut self, key: Cow<'_, str>, value: Cow<'_, str>) {
        (**self).set(key, value)
    }
}
