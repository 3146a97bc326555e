//! Actions for processing coverage issues.
//!
//! Actions convert Issues into Operations and execute them.
//!
//! ## Architecture
//!
//! ```text
//! Issue (problem detected)
//!     ↓
//! Action (Issue → Operation conversion)
//!     ↓
//! Operation (file edit)
//!     ↓
//! execute (file modification)
//! ```
//!
//! ## Actions
//!
//! - [`RewriteCoverage`]: Rewrite `CoversClass` / `CoversMethod` attribute groups (fix)

mod operation;
mod rewrite_coverage;
mod traits;

pub use operation::Operation;
pub use rewrite_coverage::RewriteCoverage;
pub(crate) use traits::execute_operations;
pub use traits::{Action, ActionStats};
