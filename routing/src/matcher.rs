use core::ops::Range;
use std::borrow::Cow;

use crate::{Params, Segment, TrailingSlash};

/// A request path split for matching: leading slash removed, trailing slash
/// recorded separately.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestPath<'a> {
    full: &'a str,
    trimmed: &'a str,
    trailing_slash: bool,
}

impl<'a> RequestPath<'a> {
    pub fn new(path: &'a str) -> RequestPath<'a> {
        let full = path.strip_prefix('/').unwrap_or(path);
        match full.strip_suffix('/') {
            Some(trimmed) => RequestPath {
                full,
                trimmed,
                trailing_slash: true,
            },
            None => RequestPath {
                full,
                trimmed: full,
                trailing_slash: false,
            },
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = Range<usize>> + 'a {
        into_segments(self.trimmed)
    }
}

pub(crate) fn into_segments(input: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    let mut progress = 0usize;
    let mut done = input.is_empty();

    core::iter::from_fn(move || {
        if done {
            return None;
        }

        match input[progress..].find('/') {
            Some(idx) => {
                let range = progress..progress + idx;
                progress += idx + 1;
                Some(range)
            }
            None => {
                done = true;
                Some(progress..input.len())
            }
        }
    })
}

/// Matches `segments` against the leading part of `path`. `None` when a
/// segment does not match or the path runs out first.
fn match_segments<P: Params>(
    segments: &[Segment<'_>],
    path: &RequestPath<'_>,
    params: &mut P,
) -> Option<Remaining> {
    let mut iter = path.segments().peekable();

    for segment in segments {
        match segment {
            Segment::Literal(literal) => {
                let range = iter.next()?;
                if *literal != &path.trimmed[range] {
                    return None;
                }
            }
            Segment::Param(name) => {
                let range = iter.next()?;
                if range.is_empty() {
                    return None;
                }
                params.set(Cow::Borrowed(&**name), Cow::Borrowed(&path.trimmed[range]));
            }
            Segment::Rest(name) => {
                let rest = match iter.peek() {
                    Some(range) => &path.full[range.start..],
                    None => "",
                };
                params.set(Cow::Borrowed(&**name), Cow::Borrowed(rest));
                return Some(Remaining::Consumed);
            }
        }
    }

    match iter.next() {
        Some(_) => Some(Remaining::Segments),
        None => Some(Remaining::Empty),
    }
}

enum Remaining {
    Empty,
    Segments,
    Consumed,
}

pub(crate) fn match_path<P: Params>(
    segments: &[Segment<'_>],
    trailing_slash: bool,
    path: &str,
    policy: TrailingSlash,
    params: &mut P,
) -> bool {
    let path = RequestPath::new(path);

    match match_segments(segments, &path, params) {
        Some(Remaining::Consumed) => true,
        Some(Remaining::Empty) => match policy {
            TrailingSlash::Ignore => true,
            TrailingSlash::Strict => path.trailing_slash == trailing_slash,
        },
        _ => false,
    }
}

pub(crate) fn match_prefix<P: Params>(segments: &[Segment<'_>], path: &str, params: &mut P) -> bool {
    let path = RequestPath::new(path);
    match_segments(segments, &path, params).is_some()
}
