use crate::Segment;

peg::parser! {
    grammar template() for str {

        pub rule parse() -> (Vec<Segment<'input>>, bool)
            = "/"? segments:(segment() ++ "/") trailing:"/"? ![_] {
                (segments, trailing.is_some())
            }
            / "/"? ![_] { (Vec::new(), false) }

        rule segment() -> Segment<'input>
            = rest_segment() / param_segment() / literal_segment()

        rule rest_segment() -> Segment<'input>
            = "{" n:$(name()) "..." "}" {
                Segment::Rest(n.into())
            }

        rule param_segment() -> Segment<'input>
            = "{" n:$(name()) "}" {
                Segment::Param(n.into())
            }

        rule literal_segment() -> Segment<'input>
            = l:$(literal_char()+) {
                Segment::Literal(l.into())
            }

        rule name()
            = ['a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-']+

        rule literal_char()
            = [^ '/' | '{' | '}' | '?' | '#']
    }
}

pub type ParseError = peg::error::ParseError<peg::str::LineCol>;

/// Splits a template into its segments and reports whether it ends with a slash.
pub fn parse(input: &str) -> Result<(Vec<Segment<'_>>, bool), ParseError> {
    template::parse(input)
}
