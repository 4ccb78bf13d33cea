mod error;
mod matcher;
mod method;
mod params;
mod parser;
mod segment;
mod template;

pub use self::{
    error::TemplateError,
    method::MethodFilter,
    params::Params,
    parser::{parse, ParseError},
    segment::Segment,
    template::{TrailingSlash, UriTemplate},
};
