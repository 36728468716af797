//! Contains datastructures and utility functions
//! common to both the `compiler` and the `vm`:
//!
//! - Source code representation and span annotations.
//! - The n-ary syntax tree shared by the parser and the standardizer.
//! - Runtime values and flattened control fragments.

pub mod control;
pub mod data;
pub mod source;
pub mod span;
pub mod tree;

pub use control::{Binder, Binop, Control, Frag, Item, Unop};
pub use data::{Closure, Data};
pub use source::Source;
pub use span::{Span, Spanned};
pub use tree::{Label, Tree};
