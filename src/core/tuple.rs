use crate::common::data::Data;
use crate::vm::trace::Trace;

/// Tuple arity; `nil` has order 0.
pub fn order(arg: Data) -> Result<Data, Trace> {
    match arg {
        Data::Nil => Ok(Data::Integer(0)),
        Data::Tuple(items) => Ok(Data::Integer(items.len() as i64)),
        _ => Err(Trace::type_error("`Order` expects a tuple")),
    }
}

/// `true` iff the argument is the empty tuple.
pub fn null(arg: Data) -> Data {
    Data::Boolean(arg == Data::Nil)
}

/// Appends the right operand to the left. A `nil` left operand is
/// the empty tuple; any other non-tuple left operand is promoted to
/// a 1-tuple, so `'a' aug 'b'` is the pair `(a, b)`.
pub fn aug(left: Data, right: Data) -> Data {
    let mut items = match left {
        Data::Tuple(items) => items,
        Data::Nil => vec![],
        single => vec![single],
    };
    items.push(right);
    Data::Tuple(items)
}
