//! External process orchestration.
//!
//! Generation scripts are opaque programs; this module spawns them without a
//! shell, captures their output, bounds how many run at once and how long
//! each may take.

pub mod executor;
pub mod limiter;
pub mod python;
pub mod subprocess;
