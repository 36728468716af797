// Each step in the compiler pipeline turns one datatype into another.
// loosely:
// ~> Source (string)
// -> Tokens            : lex.rs
// -> Tree              : parse.rs
// -> Standardized tree : standardize.rs
// -> Control fragments : gen.rs
// ~> Run (result)      : vm/vm.rs

pub mod gen;
pub mod lex;
pub mod parse;
pub mod standardize;
pub mod syntax;
pub mod token;

pub use gen::gen;
pub use lex::Lexer;
pub use parse::parse;
pub use standardize::standardize;
pub use syntax::Syntax;
