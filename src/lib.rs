//! # rpal
//! An interpreter for RPAL, a small applicative functional language
//! with first-class functions, tuples, conditionals and a fixed
//! catalog of primitives.
//!
//! ## Overview of the pipeline
//! Source code is represented as a [`Source`]: a string paired with
//! the path it came from. Regions of source are marked with `Span`s,
//! which are used throughout the interpreter when reporting errors.
//!
//! The first phase is lexing. The [`compiler::Lexer`] reads through
//! a source and produces a stream of `Spanned<Token>`s, greedily
//! taking the longest next token at each position.
//!
//! The token stream is then parsed into a [`Tree`] by recursive
//! descent over the RPAL grammar; each node is a label with an
//! ordered vector of children. Lexing and parsing can raise
//! [`Syntax`], a static error that pretty-prints the offending
//! region of source.
//!
//! The tree is then *standardized*: local rewrites reduce the parse
//! tree to a canonical operator set (`gamma`, `lambda`, `->`, `tau`,
//! `aug`, `Y*`, `=`). Standardization is where `let`, `where`,
//! `within`, `and`, `rec`, function forms and `@`-infixes disappear.
//!
//! The standardized tree is flattened into numbered control
//! fragments ([`Control`]): one for the program, one per lambda
//! body. These are handed to the CSE [`Machine`], a stack machine
//! that evaluates by call-by-value with shared environment frames.
//! Running can raise [`Trace`], a runtime error with a kind and,
//! where known, the source locations involved.
//!
//! To run a program end to end:
//!
//! ```
//! use rpal::{common::Source, interpret};
//!
//! let output = interpret(Source::source("Print (2 + 2)")).unwrap();
//! assert_eq!(output, "4");
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::rc::Rc;

pub mod common;
pub mod compiler;
pub mod core;
pub mod vm;

pub use common::{Control, Data, Source, Span, Spanned, Tree};
pub use compiler::{Lexer, Syntax};
pub use vm::{Machine, Trace};

/// Any error the pipeline can produce: a static one from the
/// compiler half, or a runtime one from the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Syntax(Syntax),
    Trace(Trace),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Error::Syntax(syntax) => write!(f, "{}", syntax),
            Error::Trace(trace) => write!(f, "{}", trace),
        }
    }
}

impl From<Syntax> for Error {
    fn from(syntax: Syntax) -> Error {
        Error::Syntax(syntax)
    }
}

impl From<Trace> for Error {
    fn from(trace: Trace) -> Error {
        Error::Trace(trace)
    }
}

/// Compiles a [`Source`] down to control fragments:
/// lex, parse, standardize, flatten.
pub fn compile(source: Rc<Source>) -> Result<Control, Error> {
    let tokens = Lexer::lex(source)?;
    let tree = compiler::parse(tokens)?;
    let standardized = compiler::standardize(tree);
    let control = compiler::gen(&standardized)?;
    Ok(control)
}

/// Runs compiled control fragments, returning the output `Print`
/// accumulated.
pub fn run(control: Control) -> Result<String, Trace> {
    let mut machine = Machine::init(control);
    machine.run()?;
    Ok(machine.into_output())
}

/// Compiles and runs a [`Source`], returning its printed output.
pub fn interpret(source: Rc<Source>) -> Result<String, Error> {
    let control = compile(source)?;
    let output = run(control)?;
    Ok(output)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interpret_hello() {
        let output = interpret(Source::source("Print 'hello'")).unwrap();
        assert_eq!(output, "hello");
    }

    #[test]
    fn errors_carry_their_stage() {
        assert!(matches!(
            interpret(Source::source("let X = `1 in X")),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(
            interpret(Source::source("let X = 1 in")),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(
            interpret(Source::source("1 / 0")),
            Err(Error::Trace(_))
        ));
    }
}
