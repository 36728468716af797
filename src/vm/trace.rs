use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::common::span::Span;

/// The kinds of runtime error the machine can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    UnboundIdentifier,
    TypeError,
    ArityMismatch,
    IndexOutOfBounds,
    DivisionByZero,
    /// A standardization invariant was violated; this is a bug in the
    /// compiler half, not in the user's program.
    MalformedStandardization,
}

impl Display for TraceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            TraceKind::UnboundIdentifier => "Unbound Identifier",
            TraceKind::TypeError => "Type Error",
            TraceKind::ArityMismatch => "Arity Mismatch",
            TraceKind::IndexOutOfBounds => "Index Out of Bounds",
            TraceKind::DivisionByZero => "Division by Zero",
            TraceKind::MalformedStandardization => "Malformed Standardization",
        };
        write!(f, "{}", name)
    }
}

/// Represents a runtime error: a kind, a message, and the source
/// locations that were known when the error was raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub kind: TraceKind,
    pub message: String,
    pub spans: Vec<Span>,
}

impl Trace {
    pub fn error(kind: TraceKind, message: &str, spans: Vec<Span>) -> Trace {
        Trace {
            kind,
            message: message.to_string(),
            spans,
        }
    }

    pub fn type_error(message: &str) -> Trace {
        Trace::error(TraceKind::TypeError, message, vec![])
    }

    pub fn arity(message: &str) -> Trace {
        Trace::error(TraceKind::ArityMismatch, message, vec![])
    }

    pub fn unbound(name: &str, span: Span) -> Trace {
        Trace::error(
            TraceKind::UnboundIdentifier,
            &format!("the name `{}` is not bound in this scope", name),
            vec![span],
        )
    }

    pub fn out_of_bounds(message: &str) -> Trace {
        Trace::error(TraceKind::IndexOutOfBounds, message, vec![])
    }

    pub fn division_by_zero() -> Trace {
        Trace::error(TraceKind::DivisionByZero, "division by zero", vec![])
    }

    pub fn malformed(message: &str) -> Trace {
        Trace::error(TraceKind::MalformedStandardization, message, vec![])
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if !self.spans.is_empty() {
            writeln!(f, "Traceback, most recent call last:")?;
            for span in self.spans.iter() {
                Display::fmt(span, f)?;
            }
        }

        write!(f, "Runtime {}: {}", self.kind, self.message)
    }
}
