use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::{
    error::TemplateError,
    matcher::{match_path, match_prefix},
    parser::parse,
    Params, Segment,
};

/// How a trailing slash on a request path is treated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrailingSlash {
    /// `/foo` and `/foo/` are different paths.
    #[default]
    Strict,
    /// `/foo` and `/foo/` are the same path.
    Ignore,
}

/// A parsed path pattern such as `/users/{id}` or `/static/{file...}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct UriTemplate {
    segments: Vec<Segment<'static>>,
    trailing_slash: bool,
}

impl UriTemplate {
    pub fn parse(template: &str) -> Result<UriTemplate, TemplateError> {
        let (segments, trailing_slash) = parse(template).map_err(|source| TemplateError::Syntax {
            template: template.to_string(),
            source,
        })?;

        UriTemplate::from_segments(
            segments.into_iter().map(Segment::to_owned).collect(),
            trailing_slash,
        )
    }

    pub fn from_segments(
        segments: Vec<Segment<'static>>,
        trailing_slash: bool,
    ) -> Result<UriTemplate, TemplateError> {
        let template = UriTemplate {
            segments,
            trailing_slash,
        };
        template.validate()?;
        Ok(template)
    }

    fn validate(&self) -> Result<(), TemplateError> {
        let mut names = BTreeSet::new();

        for (idx, segment) in self.segments.iter().enumerate() {
            if segment.is_rest() && (idx + 1 != self.segments.len() || self.trailing_slash) {
                return Err(TemplateError::RestNotLast {
                    template: self.to_string(),
                });
            }

            if let Some(name) = segment.name() {
                if !names.insert(name) {
                    return Err(TemplateError::DuplicateParameter {
                        template: self.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn segments(&self) -> &[Segment<'static>] {
        &self.segments
    }

    pub fn trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn has_rest(&self) -> bool {
        self.segments.last().map(Segment::is_rest).unwrap_or_default()
    }

    /// Names of all placeholders, in template order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::name)
    }

    /// Tests the whole of `path` against the template, writing captured
    /// values into `params`. Captures may be written even when the match
    /// fails, so pass a fresh sink per attempt.
    pub fn match_path<P: Params>(&self, path: &str, policy: TrailingSlash, params: &mut P) -> bool {
        match_path(&self.segments, self.trailing_slash, path, policy, params)
    }

    /// Tests whether `path` starts with the segments of this template.
    pub fn match_prefix<P: Params>(&self, path: &str, params: &mut P) -> bool {
        match_prefix(&self.segments, path, params)
    }

    /// Prefixes `child` with this template. Separators are normalized, so
    /// `/foo` and `/foo/` both join `/bar` into `/foo/bar`.
    pub fn join(&self, child: &UriTemplate) -> Result<UriTemplate, TemplateError> {
        if self.has_rest() {
            return Err(TemplateError::RestInBasePath {
                template: self.to_string(),
            });
        }

        let mut segments = self.segments.clone();
        segments.extend(child.segments.iter().cloned());

        let trailing_slash = if child.is_root() {
            self.trailing_slash
        } else {
            child.trailing_slash
        };

        UriTemplate::from_segments(segments, trailing_slash)
    }
}

impl FromStr for UriTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UriTemplate::parse(s)
    }
}

impl TryFrom<&str> for UriTemplate {
    type Error = TemplateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        UriTemplate::parse(value)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }

        for segment in self.segments.iter() {
            write!(f, "/{}", segment)?;
        }

        if self.trailing_slash {
            f.write_str("/")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::collections::BTreeMap;

    #[test]
    fn test_display_is_canonical() {
        for (input, expected) in [
            ("", "/"),
            ("/", "/"),
            ("foo", "/foo"),
            ("/foo/{id}", "/foo/{id}"),
            ("/foo/{id}/", "/foo/{id}/"),
            ("/files/{path...}", "/files/{path...}"),
        ] {
            let template = UriTemplate::parse(input).expect("parse");
            assert_eq!(template.to_string(), expected);
        }
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            UriTemplate::parse("/foo/{id"),
            Err(TemplateError::Syntax { .. })
        ));
        assert!(matches!(
            UriTemplate::parse("/{id}/{id}"),
            Err(TemplateError::DuplicateParameter { name, .. }) if name == "id"
        ));
        assert!(matches!(
            UriTemplate::parse("/{id...}/{name}"),
            Err(TemplateError::RestNotLast { .. })
        ));
        assert!(matches!(
            UriTemplate::parse("/{id...}/"),
            Err(TemplateError::RestNotLast { .. })
        ));
    }

    #[test]
    fn test_join() {
        let join = |base: &str, child: &str| {
            UriTemplate::parse(base)
                .expect("base")
                .join(&UriTemplate::parse(child).expect("child"))
                .map(|t| t.to_string())
        };

        assert_eq!(join("/foo", "/bar").expect("join"), "/foo/bar");
        assert_eq!(join("/foo/", "/bar").expect("join"), "/foo/bar");
        assert_eq!(join("/foo", "/bar/").expect("join"), "/foo/bar/");
        assert_eq!(join("/foo", "/").expect("join"), "/foo");
        assert_eq!(join("/", "/bar").expect("join"), "/bar");
        assert_eq!(join("/", "/").expect("join"), "/");
        assert_eq!(
            join("/users/{id}", "/posts/{post}").expect("join"),
            "/users/{id}/posts/{post}"
        );

        assert!(matches!(
            join("/{id}", "/{id}"),
            Err(TemplateError::DuplicateParameter { .. })
        ));
        assert!(matches!(
            join("/{all...}", "/bar"),
            Err(TemplateError::RestInBasePath { .. })
        ));
    }

    #[test]
    fn test_join_matches_like_prefix_stripping() {
        let base = UriTemplate::parse("/foo").expect("base");
        let child = UriTemplate::parse("/bar/{id}").expect("child");
        let joined = base.join(&child).expect("join");

        for path in ["/foo/bar/1", "/foo/bar", "/bar/1", "/foo/baz/1", "/foo/bar/1/"] {
            let stripped = base.match_prefix(path, &mut ())
                && path
                    .strip_prefix("/foo")
                    .map(|rest| child.match_path(rest, TrailingSlash::Strict, &mut ()))
                    .unwrap_or_default();

            assert_eq!(
                joined.match_path(path, TrailingSlash::Strict, &mut ()),
                stripped,
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_match_extracts_params() {
        let template = UriTemplate::parse("/users/{user}/posts/{post}").expect("parse");
        let mut params = BTreeMap::default();

        assert!(template.match_path("/users/ada/posts/42", TrailingSlash::Strict, &mut params));
        assert_eq!(params.get("user").map(String::as_str), Some("ada"));
        assert_eq!(params.get("post").map(String::as_str), Some("42"));
        assert_eq!(template.params().collect::<Vec<_>>(), vec!["user", "post"]);
    }
}
