use crate::common::data::Data;
use crate::vm::trace::Trace;

pub fn add(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Integer(l), Data::Integer(r)) => Ok(Data::Integer(l.wrapping_add(r))),
        _ => Err(Trace::type_error("`+` expects two integers")),
    }
}

pub fn sub(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Integer(l), Data::Integer(r)) => Ok(Data::Integer(l.wrapping_sub(r))),
        _ => Err(Trace::type_error("`-` expects two integers")),
    }
}

pub fn mul(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Integer(l), Data::Integer(r)) => Ok(Data::Integer(l.wrapping_mul(r))),
        _ => Err(Trace::type_error("`*` expects two integers")),
    }
}

/// Integer division, truncating toward zero.
pub fn div(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Integer(_), Data::Integer(0)) => Err(Trace::division_by_zero()),
        (Data::Integer(l), Data::Integer(r)) => Ok(Data::Integer(l.wrapping_div(r))),
        _ => Err(Trace::type_error("`/` expects two integers")),
    }
}

/// Non-negative integer power.
pub fn pow(left: Data, right: Data) -> Result<Data, Trace> {
    match (left, right) {
        (Data::Integer(_), Data::Integer(r)) if r < 0 => Err(Trace::type_error(
            "`**` expects a non-negative exponent",
        )),
        (Data::Integer(l), Data::Integer(r)) => {
            Ok(Data::Integer(l.wrapping_pow(r.min(u32::MAX as i64) as u32)))
        },
        _ => Err(Trace::type_error("`**` expects two integers")),
    }
}

pub fn neg(operand: Data) -> Result<Data, Trace> {
    match operand {
        Data::Integer(n) => Ok(Data::Integer(n.wrapping_neg())),
        _ => Err(Trace::type_error("`neg` expects an integer")),
    }
}
