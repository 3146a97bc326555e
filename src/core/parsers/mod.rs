//! Source file parsers.
//!
//! - `php`: PHP test files (namespace, imports, class headers and their
//!   attribute groups)

pub mod php;
