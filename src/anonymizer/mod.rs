//! Structural anonymization of declarations.
//!
//! Declared names are rewritten into role-scoped placeholders in two passes,
//! each over a freshly parsed tree of the previous pass's output:
//!
//! 1. **Class scope**: class names become `_class_` and public field names
//!    become `_property{i}_`.
//! 2. **Function scope**: function names become `_function_`, method names
//!    `_method_`, and parameter and local variable names `_variable{i}_`.
//!
//! Numbering restarts for every declaration. Each declaration's own text is
//! rewritten in isolation and spliced back over its byte range; bytes outside
//! every rewritten declaration are left untouched.

mod parser;
mod rewriter;
mod scope;

pub use parser::{grammar, parse};
pub use rewriter::*;
pub use scope::*;
