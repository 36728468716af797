//! This module provides the standard language library:
//! the primitive functions bound in environment 0,
//! and the implementations behind the operator items.

pub mod io;
pub mod logic;
pub mod math;
pub mod predicate;
pub mod string;
pub mod tuple;

use std::collections::HashMap;

use crate::common::data::Data;
use crate::vm::trace::Trace;

/// The primitive functions. `Conc` is the only one that takes two
/// arguments; it is applied one argument at a time and sits on the
/// stack partially applied in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Conc,
    Stern,
    Stem,
    Order,
    Null,
    Isinteger,
    Isstring,
    Istuple,
    Isfunction,
    Isdummy,
    Istruthvalue,
    ItoS,
}

impl Builtin {
    pub fn arity(&self) -> usize {
        match self {
            Builtin::Conc => 2,
            _ => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print => "Print",
            Builtin::Conc => "Conc",
            Builtin::Stern => "Stern",
            Builtin::Stem => "Stem",
            Builtin::Order => "Order",
            Builtin::Null => "Null",
            Builtin::Isinteger => "Isinteger",
            Builtin::Isstring => "Isstring",
            Builtin::Istuple => "Istuple",
            Builtin::Isfunction => "Isfunction",
            Builtin::Isdummy => "Isdummy",
            Builtin::Istruthvalue => "Istruthvalue",
            Builtin::ItoS => "ItoS",
        }
    }
}

/// The bindings of environment 0, available to every program.
/// `print` is an alias for `Print`.
pub fn bindings() -> HashMap<String, Data> {
    let builtins = [
        Builtin::Print,
        Builtin::Conc,
        Builtin::Stern,
        Builtin::Stem,
        Builtin::Order,
        Builtin::Null,
        Builtin::Isinteger,
        Builtin::Isstring,
        Builtin::Istuple,
        Builtin::Isfunction,
        Builtin::Isdummy,
        Builtin::Istruthvalue,
        Builtin::ItoS,
    ];

    let mut env = HashMap::new();
    for fun in builtins {
        env.insert(fun.name().to_string(), Data::Builtin { fun, args: vec![] });
    }
    env.insert(
        "print".to_string(),
        Data::Builtin {
            fun: Builtin::Print,
            args: vec![],
        },
    );
    env
}

/// Applies a saturated primitive. The machine has already checked
/// the arity; `output` is its `Print` buffer.
pub fn apply(fun: Builtin, args: Vec<Data>, output: &mut String) -> Result<Data, Trace> {
    match fun {
        Builtin::Print => Ok(io::print(&one(args)?, output)),
        Builtin::Conc => {
            let (left, right) = two(args)?;
            string::conc(left, right)
        },
        Builtin::Stern => string::stern(one(args)?),
        Builtin::Stem => string::stem(one(args)?),
        Builtin::Order => tuple::order(one(args)?),
        Builtin::Null => Ok(tuple::null(one(args)?)),
        Builtin::Isinteger => Ok(predicate::is_integer(one(args)?)),
        Builtin::Isstring => Ok(predicate::is_string(one(args)?)),
        Builtin::Istuple => Ok(predicate::is_tuple(one(args)?)),
        Builtin::Isfunction => Ok(predicate::is_function(one(args)?)),
        Builtin::Isdummy => Ok(predicate::is_dummy(one(args)?)),
        Builtin::Istruthvalue => Ok(predicate::is_truthvalue(one(args)?)),
        Builtin::ItoS => string::itos(one(args)?),
    }
}

fn one(mut args: Vec<Data>) -> Result<Data, Trace> {
    match args.pop() {
        Some(arg) if args.is_empty() => Ok(arg),
        _ => Err(Trace::malformed("a unary builtin was handed the wrong number of arguments")),
    }
}

fn two(mut args: Vec<Data>) -> Result<(Data, Data), Trace> {
    match (args.pop(), args.pop()) {
        (Some(second), Some(first)) if args.is_empty() => Ok((first, second)),
        _ => Err(Trace::malformed("a binary builtin was handed the wrong number of arguments")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn env_zero_catalog() {
        let env = bindings();
        for name in [
            "Print", "print", "Conc", "Stern", "Stem", "Order", "Null", "Isinteger", "Isstring",
            "Istuple", "Isfunction", "Isdummy", "Istruthvalue", "ItoS",
        ] {
            assert!(env.contains_key(name), "missing builtin {}", name);
        }
    }

    #[test]
    fn print_and_its_alias_agree() {
        let env = bindings();
        assert_eq!(env.get("Print"), env.get("print"));
    }
}
