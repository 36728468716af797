use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::common::span::Span;

/// Which front-end stage rejected the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// An illegal character or unterminated string.
    Lexical,
    /// A grammar violation, including trailing tokens.
    Syntax,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Stage::Lexical => write!(f, "Lexical Error"),
            Stage::Syntax => write!(f, "Syntax Error"),
        }
    }
}

/// Represents a static error found at compile time,
/// with the location it corresponds to.
#[derive(Debug, Clone, PartialEq)]
pub struct Syntax {
    pub stage: Stage,
    pub reason: String,
    pub span: Span,
}

impl Syntax {
    /// A grammar error at a location.
    pub fn error(reason: &str, span: &Span) -> Syntax {
        Syntax {
            stage: Stage::Syntax,
            reason: reason.to_string(),
            span: span.clone(),
        }
    }

    /// A scanning error at a location.
    pub fn lexical(reason: &str, span: &Span) -> Syntax {
        Syntax {
            stage: Stage::Lexical,
            reason: reason.to_string(),
            span: span.clone(),
        }
    }
}

impl Display for Syntax {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.span)?;
        write!(f, "{}: {}", self.stage, self.reason)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;

    #[test]
    fn error_format() {
        let source = Source::source("let X = `42 in X");
        let error = Syntax::lexical("the character '`' is not recognized", &Span::new(&source, 8, 1));

        let target = "\
Line 1:9
  |
1 | let X = `42 in X
  |         ^
Lexical Error: the character '`' is not recognized";

        assert_eq!(format!("{}", error), target);
    }
}
