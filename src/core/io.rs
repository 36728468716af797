use crate::common::data::Data;

/// `Print` is strict: the canonical text of the argument is appended
/// to the machine's output buffer, and `dummy` is returned. Nothing
/// reaches stdout until the driver flushes the buffer at end of run.
pub fn print(arg: &Data, output: &mut String) -> Data {
    output.push_str(&arg.to_string());
    Data::Dummy
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn print_buffers_and_returns_dummy() {
        let mut output = String::new();
        let result = print(&Data::Tuple(vec![Data::Integer(3), Data::Integer(4)]), &mut output);
        assert_eq!(result, Data::Dummy);
        assert_eq!(output, "(3, 4)");
    }
}
