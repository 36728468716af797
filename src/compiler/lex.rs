use std::rc::Rc;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::source::Source;
use crate::common::span::{Span, Spanned};
use crate::compiler::syntax::Syntax;
use crate::compiler::token::{is_keyword, Token, Tokens};

/// The token classes, in priority order. Ties in match length are
/// resolved in favor of the earlier class, so a reserved word beats
/// an identifier and an identifier beats a lone `_` operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Word,
    Int,
    Str,
    Op,
    Punct,
}

static PATTERNS: Lazy<Vec<(Class, Regex)>> = Lazy::new(|| {
    // each pattern is anchored so it can only consume at the cursor
    vec![
        (Class::Word, Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap()),
        (Class::Int, Regex::new(r"^[0-9]+").unwrap()),
        (Class::Str, Regex::new(r"^'(?:\\[tn\\']|''|[^'\\])*'").unwrap()),
        // `;` lexes as punctuation and `'` opens a string,
        // so neither belongs to the operator class
        (
            Class::Op,
            Regex::new(r#"^[+\-*/<>&.@:=~|$!#%^_\[\]{}"?]+"#).unwrap(),
        ),
        (Class::Punct, Regex::new(r"^[(),;]").unwrap()),
    ]
});

static BLANK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[ \t\r\n]+|//[^\n]*)").unwrap());

#[derive(Debug)]
pub struct Lexer {
    source: Rc<Source>,
    index: usize,
    tokens: Tokens,
}

impl Lexer {
    /// Lexes a source file into a stream of spanned tokens,
    /// ending with `Token::End`.
    pub fn lex(source: Rc<Source>) -> Result<Tokens, Syntax> {
        let mut lexer = Lexer {
            source,
            index: 0,
            tokens: vec![],
        };

        lexer.strip();

        while lexer.index < lexer.source.contents.len() {
            let token = lexer.next_token()?;
            lexer.tokens.push(token);
            lexer.strip();
        }

        let end = Span::new(&lexer.source, lexer.source.contents.len(), 0);
        lexer.tokens.push(Spanned::new(Token::End, end));
        Ok(lexer.tokens)
    }

    fn remaining(&self) -> &str {
        &self.source.contents[self.index..]
    }

    /// Skips whitespace (newlines included) and `//` line comments.
    fn strip(&mut self) {
        while let Some(end) = BLANK.find(self.remaining()).map(|matched| matched.end()) {
            self.index += end;
        }
    }

    /// Scans the next token. Every pattern is tried at the cursor;
    /// the longest match wins, with the pattern table's order
    /// breaking ties.
    fn next_token(&mut self) -> Result<Spanned<Token>, Syntax> {
        let rest = self.remaining();

        let mut best: Option<(Class, usize)> = None;
        for (class, pattern) in PATTERNS.iter() {
            if let Some(matched) = pattern.find(rest) {
                let len = matched.end();
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((*class, len));
                }
            }
        }

        let (class, mut len) = match best {
            Some(found) => found,
            None => return Err(self.unrecognized()),
        };

        // a comment can open mid-operator: `x +// rest of line`
        if class == Class::Op {
            if let Some(comment) = rest[..len].find("//") {
                len = comment.max(1);
            }
        }

        let span = Span::new(&self.source, self.index, len);
        let text = &rest[..len];

        let token = match class {
            Class::Word if is_keyword(text) => Token::Keyword(text.to_string()),
            Class::Word => Token::Iden(text.to_string()),
            Class::Int => Token::Int(i64::from_str(text).map_err(|_| {
                Syntax::lexical(
                    "integer literal too large to fit in a signed 64-bit integer",
                    &span,
                )
            })?),
            Class::Str => Token::Str(unescape(&text[1..text.len() - 1])),
            Class::Op => Token::Op(text.to_string()),
            Class::Punct => Token::Punct(text.as_bytes()[0] as char),
        };

        self.index += len;
        Ok(Spanned::new(token, span))
    }

    fn unrecognized(&self) -> Syntax {
        let span = Span::point(&self.source, self.index);
        let next = self.remaining().chars().next();

        if next == Some('\'') {
            Syntax::lexical("unterminated or malformed string literal", &span)
        } else {
            Syntax::lexical(
                &format!(
                    "the character `{}` is not recognized here",
                    next.map(String::from).unwrap_or_default(),
                ),
                &span,
            )
        }
    }
}

/// Resolves the escapes the scanner admitted: `\t`, `\n`, `\\`, `\'`,
/// and the doubled apostrophe `''`.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some('\\') => out.push('\\'),
                Some('\'') => out.push('\''),
                // the scanner only lets the four escapes above through
                Some(other) => out.push(other),
                None => (),
            },
            '\'' => {
                // must be the first half of a doubled apostrophe
                chars.next();
                out.push('\'');
            },
            c => out.push(c),
        }
    }

    out
}
