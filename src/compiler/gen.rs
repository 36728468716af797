use crate::common::control::{Binder, Binop, Control, Frag, Item, Unop};
use crate::common::data::Data;
use crate::common::span::Spanned;
use crate::common::tree::{Label, Tree};
use crate::vm::trace::Trace;

/// Flattens a standardized tree into numbered control fragments.
/// Fragment 0 is the whole program; every lambda body gets a fresh
/// fragment of its own, referenced by index from a `Lambda` item.
///
/// The tree must be standardized. A leftover parse-only label is an
/// upstream bug and is reported as `MalformedStandardization`.
pub fn gen(tree: &Tree) -> Result<Control, Trace> {
    let mut generator = Generator {
        frags: vec![vec![]],
    };
    generator.walk(0, tree)?;
    Ok(Control {
        frags: generator.frags,
    })
}

struct Generator {
    frags: Vec<Frag>,
}

impl Generator {
    fn fresh(&mut self) -> usize {
        self.frags.push(vec![]);
        self.frags.len() - 1
    }

    fn emit(&mut self, frag: usize, item: Item) {
        self.frags[frag].push(item);
    }

    /// Emits a subtree into a fragment, in execution order:
    /// operands land before the item that consumes them.
    fn walk(&mut self, frag: usize, tree: &Tree) -> Result<(), Trace> {
        match &tree.label {
            // leaves
            Label::Id(name) => self.emit(
                frag,
                Item::Name(Spanned::new(name.clone(), tree.span.clone())),
            ),
            Label::Int(value) => self.emit(frag, Item::Value(Data::Integer(*value))),
            Label::Str(body) => self.emit(frag, Item::Value(Data::String(body.clone()))),
            Label::True => self.emit(frag, Item::Value(Data::Boolean(true))),
            Label::False => self.emit(frag, Item::Value(Data::Boolean(false))),
            Label::Nil => self.emit(frag, Item::Value(Data::Nil)),
            Label::Dummy => self.emit(frag, Item::Value(Data::Dummy)),
            Label::YStar => self.emit(frag, Item::YStar),

            // the rand is computed first, so the rator ends up on top
            Label::Gamma => {
                let (rator, rand) = self.two(tree)?;
                self.walk(frag, rand)?;
                self.walk(frag, rator)?;
                self.emit(frag, Item::Gamma);
            },

            Label::Lambda => {
                let (binder, body) = self.two(tree)?;
                let binder = self.binder(binder)?;
                let inner = self.fresh();
                self.walk(inner, body)?;
                self.emit(frag, Item::Lambda { frag: inner, binder });
            },

            // the condition runs in this fragment; each arm gets its own
            Label::Cond => {
                let (condition, then, other) = match tree.children.as_slice() {
                    [condition, then, other] => (condition, then, other),
                    _ => return Err(self.misshapen(tree)),
                };
                self.walk(frag, condition)?;
                let then_frag = self.fresh();
                self.walk(then_frag, then)?;
                let other_frag = self.fresh();
                self.walk(other_frag, other)?;
                self.emit(
                    frag,
                    Item::Beta {
                        then: then_frag,
                        other: other_frag,
                    },
                );
            },

            Label::Tau => {
                for element in &tree.children {
                    self.walk(frag, element)?;
                }
                self.emit(frag, Item::Tau(tree.children.len()));
            },

            Label::Aug => {
                let (tuple, element) = self.two(tree)?;
                self.walk(frag, tuple)?;
                self.walk(frag, element)?;
                self.emit(frag, Item::Aug);
            },

            Label::Or => self.binop(frag, tree, Binop::Or)?,
            Label::Amp => self.binop(frag, tree, Binop::And)?,
            Label::Gr => self.binop(frag, tree, Binop::Gr)?,
            Label::Ge => self.binop(frag, tree, Binop::Ge)?,
            Label::Ls => self.binop(frag, tree, Binop::Ls)?,
            Label::Le => self.binop(frag, tree, Binop::Le)?,
            Label::Eq => self.binop(frag, tree, Binop::Eq)?,
            Label::Ne => self.binop(frag, tree, Binop::Ne)?,
            Label::Add => self.binop(frag, tree, Binop::Add)?,
            Label::Sub => self.binop(frag, tree, Binop::Sub)?,
            Label::Mul => self.binop(frag, tree, Binop::Mul)?,
            Label::Div => self.binop(frag, tree, Binop::Div)?,
            Label::Pow => self.binop(frag, tree, Binop::Pow)?,

            Label::Neg => self.unop(frag, tree, Unop::Neg)?,
            Label::Not => self.unop(frag, tree, Unop::Not)?,

            // anything else should have been standardized away
            _ => return Err(self.misshapen(tree)),
        }

        Ok(())
    }

    fn binop(&mut self, frag: usize, tree: &Tree, op: Binop) -> Result<(), Trace> {
        let (left, right) = self.two(tree)?;
        self.walk(frag, left)?;
        self.walk(frag, right)?;
        self.emit(frag, Item::Binop(op));
        Ok(())
    }

    fn unop(&mut self, frag: usize, tree: &Tree, op: Unop) -> Result<(), Trace> {
        match tree.children.as_slice() {
            [operand] => {
                self.walk(frag, operand)?;
                self.emit(frag, Item::Unop(op));
                Ok(())
            },
            _ => Err(self.misshapen(tree)),
        }
    }

    fn two<'a>(&self, tree: &'a Tree) -> Result<(&'a Tree, &'a Tree), Trace> {
        match tree.children.as_slice() {
            [first, second] => Ok((first, second)),
            _ => Err(self.misshapen(tree)),
        }
    }

    /// Reads a binder position: a name, a `,`-list of names, or `()`.
    fn binder(&self, tree: &Tree) -> Result<Binder, Trace> {
        match &tree.label {
            Label::Id(name) => Ok(Binder::Id(name.clone())),
            Label::Empty => Ok(Binder::Unit),
            Label::Comma => {
                let mut names = vec![];
                for child in &tree.children {
                    match &child.label {
                        Label::Id(name) => names.push(name.clone()),
                        _ => return Err(self.misshapen(child)),
                    }
                }
                Ok(Binder::Tuple(names))
            },
            _ => Err(self.misshapen(tree)),
        }
    }

    fn misshapen(&self, tree: &Tree) -> Trace {
        Trace::malformed(&format!(
            "`{}` with {} children cannot appear in a standardized tree",
            tree.label,
            tree.children.len(),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::Lexer;
    use crate::compiler::parse::parse;
    use crate::compiler::standardize::standardize;

    fn control(source: &str) -> Control {
        let tree = standardize(parse(Lexer::lex(Source::source(source)).unwrap()).unwrap());
        gen(&tree).unwrap()
    }

    fn shapes(frag: &[Item]) -> Vec<&'static str> {
        frag.iter()
            .map(|item| match item {
                Item::Value(_) => "value",
                Item::Name(_) => "name",
                Item::Lambda { .. } => "lambda",
                Item::Gamma => "gamma",
                Item::Tau(_) => "tau",
                Item::Aug => "aug",
                Item::Beta { .. } => "beta",
                Item::YStar => "ystar",
                Item::Binop(_) => "binop",
                Item::Unop(_) => "unop",
                Item::Env(_) => "env",
            })
            .collect()
    }

    #[test]
    fn application_order() {
        // rand, rator, gamma: `Print 42` computes 42 first
        let control = control("Print 42");
        assert_eq!(shapes(control.frag(0)), vec!["value", "name", "gamma"]);
    }

    #[test]
    fn lambda_body_gets_its_own_fragment() {
        let control = control("fn x . x + 1");
        assert_eq!(control.frags.len(), 2);
        assert_eq!(shapes(control.frag(0)), vec!["lambda"]);
        assert_eq!(shapes(control.frag(1)), vec!["name", "value", "binop"]);

        match &control.frag(0)[0] {
            Item::Lambda { frag, binder } => {
                assert_eq!(*frag, 1);
                assert_eq!(*binder, Binder::Id("x".to_string()));
            },
            other => panic!("expected a lambda item, found {:?}", other),
        }
    }

    #[test]
    fn conditional_arms_are_separate_fragments() {
        let control = control("true -> 1 | 2");
        assert_eq!(control.frags.len(), 3);
        // condition first, then the dispatch
        assert_eq!(shapes(control.frag(0)), vec!["value", "beta"]);
        assert_eq!(shapes(control.frag(1)), vec!["value"]);
        assert_eq!(shapes(control.frag(2)), vec!["value"]);
    }

    #[test]
    fn tuple_elements_in_source_order() {
        let control = control("1, 2, 3");
        assert_eq!(
            shapes(control.frag(0)),
            vec!["value", "value", "value", "tau"]
        );
        assert_eq!(control.frag(0)[3], Item::Tau(3));
    }

    #[test]
    fn unstandardized_trees_are_rejected() {
        let tokens = Lexer::lex(Source::source("let X = 1 in X")).unwrap();
        let raw = parse(tokens).unwrap();
        let result = gen(&raw);
        assert!(matches!(
            result,
            Err(Trace {
                kind: crate::vm::trace::TraceKind::MalformedStandardization,
                ..
            })
        ));
    }
}
