use crate::common::data::Data;

pub type Stack = Vec<Slot>;

/// One entry on the machine stack: either a computed value, or the
/// marker recording which environment was current when a closure
/// body was entered.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Env(usize),
    Data(Data),
}
