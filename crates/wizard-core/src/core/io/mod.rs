//! Provides input/output functionality for atomic structure files.
//!
//! The extended-XYZ trajectory format and the tabular restart format used for PKA setup
//! share the [`traits::StructureFile`] interface. The engine parameter file (`run.in`) is
//! a plain line list and has its own writer.

pub(crate) mod format;
pub mod restart;
pub mod run_input;
pub mod traits;
pub mod xyz;
