//! # Workflows Module
//!
//! Path-level entry points that compose the `core` codecs with the `engine` algorithms.
//! Each workflow opens its inputs, runs one engine routine and writes its outputs,
//! attaching the offending path to any file error.
//!
//! - [`pka`] - Read a restart file, inject a PKA velocity and write the result
//! - [`structure`] - Load trajectories and write group-annotated frames
//! - [`training`] - Evaluate the RMSE files left in a training directory

pub mod pka;
pub mod structure;
pub mod training;
