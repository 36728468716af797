use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::common::span::Span;

/// A label names what a tree node means.
/// The parser produces the full set; after standardization only
/// `Gamma`, `Lambda`, `Cond`, `Tau`, `Aug`, `YStar`, `Bind`,
/// the operators, and the leaves remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    // definitions and sugar
    Let,
    Where,
    Within,
    And,
    Rec,
    FunctionForm,
    /// `=`, a (possibly simultaneous) binding.
    Bind,
    /// `,`, a list of identifiers bound at once.
    Comma,
    At,

    // canonical operators
    Lambda,
    Gamma,
    /// `->`, the three-armed conditional.
    Cond,
    Tau,
    Aug,
    /// `Y*`, the fixed-point operator introduced by `rec`.
    YStar,

    // operators
    Or,
    /// `&`, boolean conjunction.
    Amp,
    Not,
    Gr,
    Ge,
    Ls,
    Le,
    Eq,
    Ne,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,

    // leaves
    Id(String),
    Int(i64),
    Str(String),
    True,
    False,
    Nil,
    Dummy,
    /// `()`, the empty parameter list.
    Empty,
}

impl Label {
    /// The inverse of `Display`: reads a label as it appears in a
    /// dotted-indent dump, e.g. `gamma` or `<ID:Print>`.
    pub fn parse(text: &str) -> Option<Label> {
        let label = match text {
            "let" => Label::Let,
            "where" => Label::Where,
            "within" => Label::Within,
            "and" => Label::And,
            "rec" => Label::Rec,
            "function_form" => Label::FunctionForm,
            "=" => Label::Bind,
            "," => Label::Comma,
            "@" => Label::At,
            "lambda" => Label::Lambda,
            "gamma" => Label::Gamma,
            "->" => Label::Cond,
            "tau" => Label::Tau,
            "aug" => Label::Aug,
            "Y*" => Label::YStar,
            "or" => Label::Or,
            "&" => Label::Amp,
            "not" => Label::Not,
            "gr" => Label::Gr,
            "ge" => Label::Ge,
            "ls" => Label::Ls,
            "le" => Label::Le,
            "eq" => Label::Eq,
            "ne" => Label::Ne,
            "+" => Label::Add,
            "-" => Label::Sub,
            "*" => Label::Mul,
            "/" => Label::Div,
            "**" => Label::Pow,
            "neg" => Label::Neg,
            "true" => Label::True,
            "false" => Label::False,
            "<nil>" => Label::Nil,
            "dummy" => Label::Dummy,
            "()" => Label::Empty,
            wrapped => {
                let body = wrapped.strip_prefix('<')?.strip_suffix('>')?;
                if let Some(name) = body.strip_prefix("ID:") {
                    Label::Id(name.to_string())
                } else if let Some(value) = body.strip_prefix("INT:") {
                    Label::Int(value.parse().ok()?)
                } else {
                    Label::Str(body.strip_prefix("STR:")?.to_string())
                }
            },
        };

        Some(label)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Label::Let => write!(f, "let"),
            Label::Where => write!(f, "where"),
            Label::Within => write!(f, "within"),
            Label::And => write!(f, "and"),
            Label::Rec => write!(f, "rec"),
            Label::FunctionForm => write!(f, "function_form"),
            Label::Bind => write!(f, "="),
            Label::Comma => write!(f, ","),
            Label::At => write!(f, "@"),
            Label::Lambda => write!(f, "lambda"),
            Label::Gamma => write!(f, "gamma"),
            Label::Cond => write!(f, "->"),
            Label::Tau => write!(f, "tau"),
            Label::Aug => write!(f, "aug"),
            Label::YStar => write!(f, "Y*"),
            Label::Or => write!(f, "or"),
            Label::Amp => write!(f, "&"),
            Label::Not => write!(f, "not"),
            Label::Gr => write!(f, "gr"),
            Label::Ge => write!(f, "ge"),
            Label::Ls => write!(f, "ls"),
            Label::Le => write!(f, "le"),
            Label::Eq => write!(f, "eq"),
            Label::Ne => write!(f, "ne"),
            Label::Add => write!(f, "+"),
            Label::Sub => write!(f, "-"),
            Label::Mul => write!(f, "*"),
            Label::Div => write!(f, "/"),
            Label::Pow => write!(f, "**"),
            Label::Neg => write!(f, "neg"),
            Label::Id(name) => write!(f, "<ID:{}>", name),
            Label::Int(value) => write!(f, "<INT:{}>", value),
            Label::Str(body) => write!(f, "<STR:{}>", body),
            Label::True => write!(f, "true"),
            Label::False => write!(f, "false"),
            Label::Nil => write!(f, "<nil>"),
            Label::Dummy => write!(f, "dummy"),
            Label::Empty => write!(f, "()"),
        }
    }
}

/// A node in the syntax tree: a label with an ordered child vector.
/// The same representation is used before and after standardization;
/// only the label set shrinks.
#[derive(Debug, Clone)]
pub struct Tree {
    pub label: Label,
    pub children: Vec<Tree>,
    pub span: Span,
}

// Span is a reporting aid, not part of the tree's identity:
// a reparsed dump is equal to the tree it was dumped from.
impl PartialEq for Tree {
    fn eq(&self, other: &Tree) -> bool {
        self.label == other.label && self.children == other.children
    }
}

impl Eq for Tree {}

impl Tree {
    pub fn leaf(label: Label, span: Span) -> Tree {
        Tree {
            label,
            children: vec![],
            span,
        }
    }

    /// Builds an internal node; its span covers all its children.
    pub fn branch(label: Label, children: Vec<Tree>) -> Tree {
        let span = Span::join(&children.iter().map(|c| c.span.clone()).collect::<Vec<_>>());
        Tree {
            label,
            children,
            span,
        }
    }

    /// Pre-order dotted-indent dump: each node on its own line,
    /// preceded by one dot per level of depth.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, 0);
        out
    }

    fn write(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push('.');
        }
        out.push_str(&self.label.to_string());
        out.push('\n');
        for child in &self.children {
            child.write(out, depth + 1);
        }
    }

    /// Rebuilds a tree from its dotted-indent dump.
    /// Returns `None` on malformed input: an unknown label, a skipped
    /// depth, or more than one root.
    pub fn parse_dump(text: &str) -> Option<Tree> {
        let mut stack: Vec<(usize, Tree)> = vec![];

        for line in text.lines() {
            if line.is_empty() {
                continue;
            }

            let depth = line.bytes().take_while(|b| *b == b'.').count();
            let label = Label::parse(&line[depth..])?;
            let node = Tree::leaf(label, Span::empty());

            // close out finished subtrees deeper than this node
            while stack.last().map_or(false, |(d, _)| *d >= depth) {
                let done = match stack.pop() {
                    Some((_, done)) => done,
                    None => break,
                };
                stack.last_mut()?.1.children.push(done);
            }

            match stack.last() {
                None if depth != 0 => return None,
                Some((d, _)) if d + 1 != depth => return None,
                _ => (),
            }

            stack.push((depth, node));
        }

        let (_, mut tree) = stack.pop()?;
        while let Some((_, mut parent)) = stack.pop() {
            parent.children.push(tree);
            tree = parent;
        }

        Some(tree)
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.dump())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(name: &str) -> Tree {
        Tree::leaf(Label::Id(name.to_string()), Span::empty())
    }

    #[test]
    fn dump_depth() {
        let tree = Tree::branch(
            Label::Let,
            vec![
                Tree::branch(Label::Bind, vec![id("X"), Tree::leaf(Label::Int(42), Span::empty())]),
                id("X"),
            ],
        );

        assert_eq!(tree.dump(), "let\n.=\n..<ID:X>\n..<INT:42>\n.<ID:X>\n");
    }

    #[test]
    fn dump_round_trip() {
        let tree = Tree::branch(
            Label::Gamma,
            vec![
                Tree::branch(Label::Lambda, vec![id("X"), id("X")]),
                Tree::leaf(Label::Str("hi there".to_string()), Span::empty()),
            ],
        );

        let reparsed = Tree::parse_dump(&tree.dump()).unwrap();
        assert_eq!(reparsed, tree);
    }

    #[test]
    fn parse_dump_rejects_two_roots() {
        assert_eq!(Tree::parse_dump("gamma\ngamma\n"), None);
    }

    #[test]
    fn parse_dump_rejects_skipped_depth() {
        assert_eq!(Tree::parse_dump("gamma\n..<ID:x>\n"), None);
    }

    #[test]
    fn label_spellings() {
        for text in ["let", "->", "**", "Y*", "<nil>", "()", "<STR:ok>", "<INT:-7>"] {
            let label = Label::parse(text).unwrap();
            assert_eq!(label.to_string(), text);
        }
    }
}
