//! Core analysis engine.
//!
//! The pipeline has three steps:
//!
//! 1. **Scan**: collect PHP files (`file_scanner`) and parse them into
//!    class declarations with attribute spans (`parsers`)
//! 2. **Resolve**: decide the coverage attributes each class should carry
//!    (`resolver`)
//! 3. **Rewrite**: turn decisions into text edits (`rewrite`)
//!
//! `CheckContext` wires these together with lazy, cached parsing.

pub mod context;
pub mod data;
pub mod declaration;
pub mod file_scanner;
pub mod names;
pub mod parsers;
pub mod resolver;
pub mod rewrite;

pub use context::CheckContext;
pub use data::{SourceContext, SourceLocation};
