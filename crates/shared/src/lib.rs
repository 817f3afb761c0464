//! Now Playing Shared - process bootstrap helpers
//!
//! Environment, tracing, database pool and shutdown plumbing used by the
//! bot binary.

pub mod bootstrap;
