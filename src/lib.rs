//! Stackfall (workspace facade crate).
//!
//! Re-exports the workspace crates as `stackfall::{core,input,term,types}` so
//! the binary, the integration tests and the benches share one import path.

pub use stackfall_core as core;
pub use stackfall_input as input;
pub use stackfall_term as term;
pub use stackfall_types as types;
