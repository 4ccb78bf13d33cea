use routing::TrailingSlash;

/// Build-time settings of a [`Router`](crate::Router).
///
/// With the `serde` feature the options can be read from an application
/// config file:
///
/// ```toml
/// trailing_slash = "ignore"
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterOptions {
    pub trailing_slash: TrailingSlash,
}

impl RouterOptions {
    pub fn new() -> RouterOptions {
        RouterOptions::default()
    }

    pub fn trailing_slash(mut self, policy: TrailingSlash) -> Self {
        self.trailing_slash = policy;
        self
    }
}
