use std::fmt::{Display, Formatter, Result};
use std::rc::Rc;

use crate::common::source::Source;

/// A `Span` refers to a section of a source,
/// much like a `&str`, but with a reference to a `Source` rather than a `String`.
/// Spans are paired with other datastructures (tokens, tree nodes)
/// to be used during error reporting.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Span {
    source: Option<Rc<Source>>,
    offset: usize,
    length: usize,
}

impl Span {
    /// Creates a new `Span` from an offset with a length.
    /// All non-empty `Span`s have access to the `Source` from whence they came,
    /// so they can't be misinterpreted or miscombined.
    pub fn new(source: &Rc<Source>, offset: usize, length: usize) -> Span {
        Span {
            source: Some(Rc::clone(source)),
            offset,
            length,
        }
    }

    /// A `Span` that points at a specific offset in the source.
    pub fn point(source: &Rc<Source>, offset: usize) -> Span {
        Span::new(source, offset, 1)
    }

    /// Creates a new empty `Span`.
    /// An empty `Span` has no source; combined with another `Span`,
    /// the result is just the other `Span`.
    pub fn empty() -> Span {
        Span {
            source: None,
            offset: 0,
            length: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }

    /// Creates a new `Span` which spans the space of the previous two.
    /// ```plain
    /// hello this is cool
    /// ^^^^^              | Span a
    ///            ^^      | Span b
    /// ^^^^^^^^^^^^^      | combined
    /// ```
    pub fn combine(a: &Span, b: &Span) -> Span {
        let (a_source, b_source) = match (&a.source, &b.source) {
            (None, _) => return b.clone(),
            (_, None) => return a.clone(),
            (Some(a), Some(b)) => (a, b),
        };

        if a_source != b_source {
            return a.clone();
        }

        let offset = a.offset.min(b.offset);
        let end = (a.offset + a.length).max(b.offset + b.length);
        Span::new(a_source, offset, end - offset)
    }

    /// Combines a set of `Span`s (think fold over `Span::combine`).
    pub fn join(spans: &[Span]) -> Span {
        let mut combined = Span::empty();

        for span in spans {
            combined = Span::combine(&combined, span);
        }

        combined
    }

    /// The text this `Span` refers to, or `""` for an empty `Span`.
    pub fn contents(&self) -> &str {
        match &self.source {
            Some(source) => &source.contents[self.offset..self.offset + self.length],
            None => "",
        }
    }

    /// The 1-indexed line and column where this `Span` starts,
    /// or `None` for an empty `Span`.
    pub fn line_col(&self) -> Option<(usize, usize)> {
        let source = self.source.as_ref()?;
        let before = &source.contents[..self.offset.min(source.contents.len())];

        let line = before.matches('\n').count() + 1;
        let col = before.len() - before.rfind('\n').map(|i| i + 1).unwrap_or(0) + 1;
        Some((line, col))
    }

    fn end_line(&self) -> usize {
        let source = self.source.as_ref().unwrap();
        let end = (self.offset + self.length).min(source.contents.len());
        source.contents[..end].matches('\n').count() + 1
    }
}

impl Display for Span {
    /// Given a `Span`, `fmt` will print out where the `Span` occurs in its source.
    /// Single-line `Span`s:
    /// ```plain
    /// Line 1:7
    ///   |
    /// 1 | let X blatant error in X
    ///   |       ^^^^^^^^^^^^^
    /// ```
    /// Multi-line `Span`s print every spanned line behind a `>` gutter.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let source = match &self.source {
            Some(source) => source,
            None => return Ok(()),
        };

        let (start_line, start_col) = self.line_col().unwrap();
        let end_line = self.end_line();
        let lines: Vec<&str> = source.contents.lines().collect();

        let readable_end = end_line.to_string();
        let padding = readable_end.len();
        let separator = format!("{} |", " ".repeat(padding));

        writeln!(f, "Line {}:{}", start_line, start_col)?;
        writeln!(f, "{}", separator)?;

        if start_line == end_line {
            let line = lines.get(start_line - 1).unwrap_or(&"");
            let carrots = self
                .length
                .min(line.len().saturating_sub(start_col - 1))
                .max(1);
            writeln!(f, "{} | {}", readable_end, line)?;
            writeln!(
                f,
                "{} | {}{}",
                " ".repeat(padding),
                " ".repeat(start_col - 1),
                "^".repeat(carrots),
            )
        } else {
            for (i, line) in lines[start_line - 1..end_line.min(lines.len())].iter().enumerate() {
                let number = (start_line + i).to_string();
                writeln!(f, "{}{} > {}", " ".repeat(padding - number.len()), number, line)?;
            }
            writeln!(f, "{}", separator)
        }
    }
}

/// A wrapper that annotates some item with a [`Span`].
/// For example, a token can be spanned to indicate
/// where it was lexed from (a `Spanned<Token>`).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Spanned<T> {
    pub item: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(item: T, span: Span) -> Spanned<T> {
        Spanned { item, span }
    }
}
