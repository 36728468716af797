use crate::common::span::Span;
use crate::common::tree::{Label, Tree};

/// Rewrites a parse tree into the canonical operator set:
/// `gamma`, `lambda`, `->`, `tau`, `aug`, `Y*` and `=`, plus the
/// primitive operators and leaves, which pass through untouched.
///
/// The pass is a single post-order walk: children first, then the
/// node itself. It is total; a shape it does not recognize is left
/// in place and rejected later during control generation.
pub fn standardize(tree: Tree) -> Tree {
    let Tree { label, children, span } = tree;
    let children: Vec<Tree> = children.into_iter().map(standardize).collect();

    match label {
        // let X = E in P  =>  (fn X . P) E
        Label::Let => {
            let [definition, body] = match <[Tree; 2]>::try_from(children) {
                Ok(pair) => pair,
                Err(children) => return Tree { label: Label::Let, children, span },
            };
            match unbind(definition) {
                Ok((name, value)) => {
                    let value = implicit_rec(&name, value);
                    Tree::branch(
                        Label::Gamma,
                        vec![Tree::branch(Label::Lambda, vec![name, body]), value],
                    )
                },
                Err(definition) => Tree {
                    label: Label::Let,
                    children: vec![definition, body],
                    span,
                },
            }
        },

        // P where X = E  =>  (fn X . P) E
        Label::Where => {
            let [body, definition] = match <[Tree; 2]>::try_from(children) {
                Ok(pair) => pair,
                Err(children) => return Tree { label: Label::Where, children, span },
            };
            match unbind(definition) {
                Ok((name, value)) => {
                    let value = implicit_rec(&name, value);
                    Tree::branch(
                        Label::Gamma,
                        vec![Tree::branch(Label::Lambda, vec![name, body]), value],
                    )
                },
                Err(definition) => Tree {
                    label: Label::Where,
                    children: vec![body, definition],
                    span,
                },
            }
        },

        // F V1 … Vn = E  =>  F = fn V1 . fn V2 . … E
        Label::FunctionForm => {
            if children.len() < 3 {
                return Tree {
                    label: Label::FunctionForm,
                    children,
                    span,
                };
            }
            let mut parts = children;
            let name = parts.remove(0);
            Tree::branch(Label::Bind, vec![name, curry(parts)])
        },

        // fn V1 … Vn . E  =>  fn V1 . fn V2 . … E
        Label::Lambda => {
            if children.len() <= 2 {
                return Tree {
                    label: Label::Lambda,
                    children,
                    span,
                };
            }
            curry(children)
        },

        // X1 = E1 within X2 = E2  =>  X2 = (fn X1 . E2) E1
        Label::Within => {
            let [outer, inner] = match <[Tree; 2]>::try_from(children) {
                Ok(pair) => pair,
                Err(children) => return Tree { label: Label::Within, children, span },
            };
            let (x1, e1) = match unbind(outer) {
                Ok(pair) => pair,
                Err(outer) => return Tree {
                    label: Label::Within,
                    children: vec![outer, inner],
                    span,
                },
            };
            let (x2, e2) = match unbind(inner) {
                Ok(pair) => pair,
                Err(inner) => return Tree {
                    label: Label::Within,
                    children: vec![rebind(x1, e1), inner],
                    span,
                },
            };
            Tree::branch(
                Label::Bind,
                vec![
                    x2,
                    Tree::branch(
                        Label::Gamma,
                        vec![Tree::branch(Label::Lambda, vec![x1, e2]), e1],
                    ),
                ],
            )
        },

        // X1 = E1 and … and Xn = En  =>  (X1, …, Xn) = tau(E1, …, En)
        Label::And => {
            let simultaneous = children.len() >= 2
                && children
                    .iter()
                    .all(|c| c.label == Label::Bind && c.children.len() == 2);
            if !simultaneous {
                return Tree {
                    label: Label::And,
                    children,
                    span,
                };
            }

            let mut names = vec![];
            let mut values = vec![];
            for child in children {
                if let Ok((name, value)) = unbind(child) {
                    names.push(name);
                    values.push(value);
                }
            }

            Tree::branch(
                Label::Bind,
                vec![
                    Tree::branch(Label::Comma, names),
                    Tree::branch(Label::Tau, values),
                ],
            )
        },

        // rec X = E  =>  X = Y* (fn X . E)
        Label::Rec => {
            let [definition] = match <[Tree; 1]>::try_from(children) {
                Ok(single) => single,
                Err(children) => return Tree { label: Label::Rec, children, span },
            };
            match unbind(definition) {
                Ok((name, value)) => {
                    let wrapped = fixed_point(name.clone(), value);
                    rebind(name, wrapped)
                },
                Err(definition) => Tree {
                    label: Label::Rec,
                    children: vec![definition],
                    span,
                },
            }
        },

        // E1 @ N E2  =>  (N E1) E2
        Label::At => {
            let [left, infix, right] = match <[Tree; 3]>::try_from(children) {
                Ok(triple) => triple,
                Err(children) => return Tree { label: Label::At, children, span },
            };
            Tree::branch(
                Label::Gamma,
                vec![Tree::branch(Label::Gamma, vec![infix, left]), right],
            )
        },

        other => Tree {
            label: other,
            children,
            span,
        },
    }
}

/// Splits a `=` node into its name and value,
/// giving the node back unchanged if it isn't a well-formed binding.
fn unbind(tree: Tree) -> Result<(Tree, Tree), Tree> {
    let Tree { label, children, span } = tree;
    if label != Label::Bind {
        return Err(Tree { label, children, span });
    }
    match <[Tree; 2]>::try_from(children) {
        Ok([name, value]) => Ok((name, value)),
        Err(children) => Err(Tree {
            label: Label::Bind,
            children,
            span,
        }),
    }
}

fn rebind(name: Tree, value: Tree) -> Tree {
    Tree::branch(Label::Bind, vec![name, value])
}

/// Folds `V1 … Vk E` into right-nested single-binder lambdas.
/// Expects at least a body.
fn curry(mut parts: Vec<Tree>) -> Tree {
    let mut result = parts.remove(parts.len() - 1);
    while let Some(binder) = parts.pop() {
        result = Tree::branch(Label::Lambda, vec![binder, result]);
    }
    result
}

/// `Y* (fn X . E)`, the value side of the rewrite behind `rec`.
fn fixed_point(name: Tree, value: Tree) -> Tree {
    Tree::branch(
        Label::Gamma,
        vec![
            Tree::leaf(Label::YStar, Span::empty()),
            Tree::branch(Label::Lambda, vec![name, value]),
        ],
    )
}

/// A function binding that mentions its own name is recursive even
/// without `rec`: `let Sum N = … Sum …` gets the fixed-point rewrite.
/// `rec` bindings never reach this (their value is already a `gamma`).
fn implicit_rec(name: &Tree, value: Tree) -> Tree {
    let recursive = match &name.label {
        Label::Id(n) => value.label == Label::Lambda && occurs_free(n, &value),
        _ => false,
    };

    if !recursive {
        return value;
    }

    fixed_point(name.clone(), value)
}

/// Does `name` occur free in a standardized expression?
fn occurs_free(name: &str, tree: &Tree) -> bool {
    match &tree.label {
        Label::Id(n) => n == name,
        Label::Lambda if tree.children.len() == 2 => {
            !binds(name, &tree.children[0]) && occurs_free(name, &tree.children[1])
        },
        _ => tree.children.iter().any(|child| occurs_free(name, child)),
    }
}

/// Does a binder position capture `name`?
fn binds(name: &str, binder: &Tree) -> bool {
    match &binder.label {
        Label::Id(n) => n == name,
        Label::Comma => binder
            .children
            .iter()
            .any(|child| matches!(&child.label, Label::Id(n) if n == name)),
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::Lexer;
    use crate::compiler::parse::parse;

    fn standardized(source: &str) -> Tree {
        standardize(parse(Lexer::lex(Source::source(source)).unwrap()).unwrap())
    }

    /// Internal labels after standardization, lambdas single-binder.
    fn canonical(tree: &Tree) -> bool {
        let ok = match &tree.label {
            Label::Gamma | Label::Cond | Label::Tau | Label::Aug | Label::YStar | Label::Bind => {
                true
            },
            Label::Lambda => tree.children.len() == 2,
            Label::Comma => true,
            Label::Or
            | Label::Amp
            | Label::Not
            | Label::Gr
            | Label::Ge
            | Label::Ls
            | Label::Le
            | Label::Eq
            | Label::Ne
            | Label::Add
            | Label::Sub
            | Label::Mul
            | Label::Div
            | Label::Pow
            | Label::Neg => true,
            label => tree.children.is_empty() && !matches!(label, Label::Let | Label::Where),
        };

        ok && tree.children.iter().all(canonical)
    }

    #[test]
    fn let_becomes_application() {
        assert_eq!(
            standardized("let X = 42 in X").dump(),
            "gamma\n.lambda\n..<ID:X>\n..<ID:X>\n.<INT:42>\n"
        );
    }

    #[test]
    fn where_matches_let() {
        assert_eq!(
            standardized("X where X = 42"),
            standardized("let X = 42 in X")
        );
    }

    #[test]
    fn function_form_curries() {
        assert_eq!(
            standardized("Add where Add x y = x").dump(),
            "gamma\n.lambda\n..<ID:Add>\n..<ID:Add>\n.lambda\n..<ID:x>\n..lambda\n...<ID:y>\n...<ID:x>\n"
        );
    }

    #[test]
    fn lambda_curries() {
        let tree = standardized("fn x y z . x");
        assert_eq!(
            tree.dump(),
            "lambda\n.<ID:x>\n.lambda\n..<ID:y>\n..lambda\n...<ID:z>\n...<ID:x>\n"
        );
    }

    #[test]
    fn and_binds_simultaneously() {
        assert_eq!(
            standardized("let X = 1 and Y = 2 in X").dump(),
            "gamma\n.lambda\n..,\n...<ID:X>\n...<ID:Y>\n..<ID:X>\n.tau\n..<INT:1>\n..<INT:2>\n"
        );
    }

    #[test]
    fn within_nests() {
        assert_eq!(
            standardized("let X = 1 within Y = X in Y").dump(),
            "gamma\n.lambda\n..<ID:Y>\n..<ID:Y>\n.gamma\n..lambda\n...<ID:X>\n...<ID:X>\n..<INT:1>\n"
        );
    }

    #[test]
    fn rec_uses_fixed_point() {
        assert_eq!(
            standardized("let rec F = fn N . F N in F").dump(),
            "gamma\n.lambda\n..<ID:F>\n..<ID:F>\n.gamma\n..Y*\n..lambda\n...<ID:F>\n...lambda\n....<ID:N>\n....gamma\n.....<ID:F>\n.....<ID:N>\n"
        );
    }

    #[test]
    fn at_becomes_nested_application() {
        assert_eq!(
            standardized("1 @ Plus 2").dump(),
            "gamma\n.gamma\n..<ID:Plus>\n..<INT:1>\n.<INT:2>\n"
        );
    }

    #[test]
    fn self_reference_is_implicitly_recursive() {
        let tree = standardized("let Sum N = N eq 0 -> 0 | N + Sum (N - 1) in Sum 10");
        assert!(tree.dump().contains("Y*\n"));
    }

    #[test]
    fn plain_bindings_stay_strict() {
        let tree = standardized("let X = 42 in X");
        assert!(!tree.dump().contains("Y*"));

        // shadowing a name is not recursion on a non-function
        let tree = standardized("let X = X in X");
        assert!(!tree.dump().contains("Y*"));
    }

    #[test]
    fn shadowed_names_are_not_free() {
        // the inner lambda rebinds F, so the outer binding is not recursive
        let tree = standardized("let F = fn F . F 1 in F");
        assert!(!tree.dump().contains("Y*"));
    }

    #[test]
    fn canonical_after_standardization() {
        for source in [
            "let X = 42 in Print X",
            "let rec F N = N eq 0 -> 1 | N * F (N - 1) in Print (F 5)",
            "let X = 1 and Y = 2 within Z = X + Y in Print Z",
            "Print ('hello' aug 'world')",
            "fn x y . x + y",
            "1 @ Plus 2 @ Minus 3",
        ] {
            assert!(canonical(&standardized(source)), "not canonical: {}", source);
        }
    }

    #[test]
    fn idempotent_on_standardized_trees() {
        for source in [
            "let X = 42 in Print X",
            "let rec F N = N eq 0 -> 1 | N * F (N - 1) in Print (F 5)",
            "let Sum N = N eq 0 -> 0 | N + Sum (N - 1) in Print (Sum 10)",
            "X where X = 1, 2, 3",
        ] {
            let once = standardized(source);
            assert_eq!(standardize(once.clone()), once);
        }
    }
}
