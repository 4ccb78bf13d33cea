use std::{borrow::Cow, fmt};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment<'a> {
    Literal(Cow<'a, str>),
    Param(Cow<'a, str>),
    Rest(Cow<'a, str>),
}

impl<'a> Segment<'a> {
    pub fn to_owned(self) -> Segment<'static> {
        match self {
            Segment::Literal(literal) => Segment::Literal(literal.into_owned().into()),
            Segment::Param(param) => Segment::Param(param.into_owned().into()),
            Segment::Rest(rest) => Segment::Rest(rest.into_owned().into()),
        }
    }

    pub fn literal(s: impl Into<Cow<'a, str>>) -> Segment<'a> {
        Segment::Literal(s.into())
    }

    pub fn param(s: impl Into<Cow<'a, str>>) -> Segment<'a> {
        Segment::Param(s.into())
    }

    pub fn rest(s: impl Into<Cow<'a, str>>) -> Segment<'a> {
        Segment::Rest(s.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Segment::Literal(l) => l,
            Segment::Param(p) => p,
            Segment::Rest(r) => r,
        }
    }

    /// Name of the placeholder, `None` for literals.
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(p) => Some(p),
            Segment::Rest(r) => Some(r),
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Segment::Rest(_))
    }
}

impl<'a> fmt::Display for Segment<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(l) => f.write_str(l),
            Segment::Param(p) => write!(f, "{{{}}}", p),
            Segment::Rest(r) => write!(f, "{{{}...}}", r),
        }
    }
}
