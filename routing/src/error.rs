use thiserror::Error;

use crate::parser::ParseError;

/// A template that cannot be used for routing. Only produced while routes are
/// being registered, never while a request is matched.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("malformed uri template '{template}': {source}")]
    Syntax {
        template: String,
        #[source]
        source: ParseError,
    },
    #[error("uri template '{template}' binds '{name}' more than once")]
    DuplicateParameter { template: String, name: String },
    #[error("uri template '{template}' has a remainder placeholder before its end")]
    RestNotLast { template: String },
    #[error("base path '{template}' cannot contain a remainder placeholder")]
    RestInBasePath { template: String },
}
