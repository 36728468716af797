//! Snippet tests for the interpreter pipeline as a whole:
//! whole programs in, printed output (or an error) out.

use rpal::common::{Source, Tree};
use rpal::compiler::{parse, standardize, Lexer};
use rpal::vm::TraceKind;
use rpal::{interpret, Error};

/// Runs a program and returns everything it printed.
fn output(program: &str) -> String {
    match interpret(Source::source(program)) {
        Ok(output) => output,
        Err(error) => panic!("program failed: {}\n{}", program, error),
    }
}

fn error(program: &str) -> Error {
    match interpret(Source::source(program)) {
        Ok(output) => panic!("program succeeded with {:?}: {}", output, program),
        Err(error) => error,
    }
}

fn runtime_kind(program: &str) -> TraceKind {
    match error(program) {
        Error::Trace(trace) => trace.kind,
        Error::Syntax(syntax) => panic!("expected a runtime error, got: {}", syntax),
    }
}

#[test]
fn prints_a_bound_value() {
    assert_eq!(output("let X = 42 in Print X"), "42");
}

#[test]
fn sums_recursively_without_rec() {
    assert_eq!(
        output("let Sum N = N eq 0 -> 0 | N + Sum (N-1) in Print (Sum 10)"),
        "55"
    );
}

#[test]
fn builds_pairs_through_a_tuple_pattern() {
    assert_eq!(
        output("let Pair(x,y) = (x,y) in Print (Pair(3,4))"),
        "(3, 4)"
    );
}

#[test]
fn computes_a_factorial_with_rec() {
    assert_eq!(
        output("let rec F N = N eq 0 -> 1 | N * F(N-1) in Print (F 5)"),
        "120"
    );
}

#[test]
fn aug_pairs_two_strings() {
    assert_eq!(output("Print ('hello' aug 'world')"), "(hello, world)");
}

#[test]
fn within_threads_a_binding() {
    assert_eq!(output("let X = 1 within Y = X+1 in Print Y"), "2");
}

#[test]
fn let_is_application() {
    let with_let = output("let x = 21 in Print (x + x)");
    let with_lambda = output("(fn x . Print (x + x)) 21");
    assert_eq!(with_let, with_lambda);
    assert_eq!(with_let, "42");
}

#[test]
fn where_is_let() {
    assert_eq!(
        output("Print (x + x) where x = 21"),
        output("let x = 21 in Print (x + x)"),
    );
}

#[test]
fn tuples_obey_their_equations() {
    assert_eq!(output("Print ((1, 2, 3) 1)"), "1");
    assert_eq!(output("Print (Order (1, 2, 3))"), "3");
    assert_eq!(output("Print (nil aug 'x')"), "(x)");
}

#[test]
fn empty_string_is_a_value() {
    assert_eq!(output("Print ''"), "");
    assert_eq!(output("Print (Conc '' 'a')"), "a");
}

#[test]
fn nil_boundaries() {
    assert_eq!(output("Print (Order nil)"), "0");
    assert_eq!(output("Print (Null nil)"), "true");
    assert_eq!(output("Print (Null (nil aug 1))"), "false");
}

#[test]
fn string_primitives() {
    assert_eq!(output("Print (Stem 'heck')"), "h");
    assert_eq!(output("Print (Stern 'heck')"), "eck");
    assert_eq!(output("Print (Conc 'fore' (ItoS 42))"), "fore42");
}

#[test]
fn predicates_from_env_zero() {
    assert_eq!(output("Print (Isinteger 1)"), "true");
    assert_eq!(output("Print (Isstring 1)"), "false");
    assert_eq!(output("Print (Istuple nil)"), "true");
    assert_eq!(output("Print (Isfunction Print)"), "true");
    assert_eq!(output("Print (Isdummy dummy)"), "true");
    assert_eq!(output("Print (Istruthvalue (1 le 2))"), "true");
}

#[test]
fn print_alias() {
    assert_eq!(output("print 'lowercase'"), "lowercase");
}

#[test]
fn higher_order_functions() {
    assert_eq!(
        output(
            "let Twice f = fn x . f (f x) in \
             let Inc x = x + 1 in \
             Print (Twice Inc 40)"
        ),
        "42"
    );
}

#[test]
fn recursion_over_booleans() {
    assert_eq!(
        output(
            "let rec Even N = N eq 0 -> true | not (Even (N - 1)) in \
             Print (Even 10, Even 7)"
        ),
        "(true, false)"
    );
}

#[test]
fn at_infix_applies_twice() {
    assert_eq!(
        output("let Add x y = x + y in Print (1 @Add 2 @Add 4)"),
        "7"
    );
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    assert_eq!(runtime_kind("Print (1 / 0)"), TraceKind::DivisionByZero);
}

#[test]
fn negative_exponent_is_a_runtime_error() {
    assert_eq!(runtime_kind("Print (2 ** (0 - 1))"), TraceKind::TypeError);
}

#[test]
fn unbound_names_are_runtime_errors() {
    assert_eq!(runtime_kind("Print Elephant"), TraceKind::UnboundIdentifier);
}

#[test]
fn lexical_and_syntax_errors_are_static() {
    assert!(matches!(
        error("let X = `42 in X"),
        Error::Syntax(_)
    ));
    assert!(matches!(error("let X = 42"), Error::Syntax(_)));
    assert!(matches!(error("1 + "), Error::Syntax(_)));
}

#[test]
fn standardized_dump_reparses_isomorphically() {
    for program in [
        "let X = 42 in Print X",
        "let rec F N = N eq 0 -> 1 | N * F(N-1) in Print (F 5)",
        "let X = 1 and Y = 2 within Z = X + Y in Print Z",
        "Print ('hello' aug 'world', 'one', 2)",
    ] {
        let tree = standardize(parse(Lexer::lex(Source::source(program)).unwrap()).unwrap());
        let reparsed = Tree::parse_dump(&tree.dump()).unwrap();
        assert_eq!(reparsed, tree, "round trip failed for: {}", program);
    }
}

#[test]
fn evaluation_is_deterministic() {
    let program = "let rec F N = N eq 0 -> 1 | N * F(N-1) in Print (F 10, Sum) \
                   where Sum = 1 + 2 + 3";
    assert_eq!(output(program), output(program));
}
