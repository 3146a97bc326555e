//! Plain data types shared by rules, issues and reporters.

mod source;

pub use source::{SourceContext, SourceLocation};
