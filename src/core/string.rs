use crate::common::data::Data;
use crate::vm::trace::Trace;

/// String concatenation; `Conc` receives its two arguments
/// one application at a time.
pub fn conc(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::String(l), Data::String(r)) => Ok(Data::String(format!("{}{}", l, r))),
        _ => Err(Trace::type_error("`Conc` expects two strings")),
    }
}

/// All but the first character. The empty string sterns to itself.
pub fn stern(arg: Data) -> Result<Data, Trace> {
    match arg {
        Data::String(s) => {
            let rest = s.chars().skip(1).collect();
            Ok(Data::String(rest))
        },
        _ => Err(Trace::type_error("`Stern` expects a string")),
    }
}

/// The first character, as a string. The empty string stems to itself.
pub fn stem(arg: Data) -> Result<Data, Trace> {
    match arg {
        Data::String(s) => {
            let head = s.chars().next().map(String::from).unwrap_or_default();
            Ok(Data::String(head))
        },
        _ => Err(Trace::type_error("`Stem` expects a string")),
    }
}

pub fn itos(arg: Data) -> Result<Data, Trace> {
    match arg {
        Data::Integer(n) => Ok(Data::String(n.to_string())),
        _ => Err(Trace::type_error("`ItoS` expects an integer")),
    }
}
