//! The deployable applications. Each is one call site supplying its own
//! configuration record to the shared composition chain; nothing about the
//! topology itself lives here.

pub mod code_exec;
pub mod vaultwarden;
