//! Data models for the preparation pipeline.

mod outcome;
mod replacement;
mod source;
mod token;

pub use outcome::*;
pub use replacement::*;
pub use source::*;
pub use token::*;
