use crate::common::data::Data;
use crate::vm::trace::Trace;

/// Structural equality across like types;
/// values of unlike types compare unequal.
pub fn equal(left: Data, right: Data) -> Data {
    Data::Boolean(left == right)
}

pub fn not_equal(left: Data, right: Data) -> Data {
    Data::Boolean(left != right)
}

pub fn greater(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Integer(l), Data::Integer(r)) => Ok(Data::Boolean(l > r)),
        _ => Err(Trace::type_error("`gr` expects two integers")),
    }
}

pub fn greater_equal(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Integer(l), Data::Integer(r)) => Ok(Data::Boolean(l >= r)),
        _ => Err(Trace::type_error("`ge` expects two integers")),
    }
}

pub fn less(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Integer(l), Data::Integer(r)) => Ok(Data::Boolean(l < r)),
        _ => Err(Trace::type_error("`ls` expects two integers")),
    }
}

pub fn less_equal(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Integer(l), Data::Integer(r)) => Ok(Data::Boolean(l <= r)),
        _ => Err(Trace::type_error("`le` expects two integers")),
    }
}

pub fn and(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Boolean(l), Data::Boolean(r)) => Ok(Data::Boolean(l && r)),
        _ => Err(Trace::type_error("`&` expects two truthvalues")),
    }
}

pub fn or(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Boolean(l), Data::Boolean(r)) => Ok(Data::Boolean(l || r)),
        _ => Err(Trace::type_error("`or` expects two truthvalues")),
    }
}

pub fn not(operand: Data) -> Result<Data, Trace> {
    match operand {
        Data::Boolean(b) => Ok(Data::Boolean(!b)),
        _ => Err(Trace::type_error("`not` expects a truthvalue")),
    }
}
