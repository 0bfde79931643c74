//! # MD Wizard Core Library
//!
//! Utilities supporting molecular-dynamics (MD) and machine-learned-potential (MLP)
//! workflows: reading and writing extended-XYZ trajectories, preparing primary
//! knock-on atom (PKA) simulations, and summarizing the accuracy of a trained
//! potential.
//!
//! ## Layout
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomicFrame`, `RestartRecord`),
//!   the element table, file codecs and small geometry helpers.
//!
//! - **[`engine`]: The Algorithms.** Pure functions and capability traits operating on the
//!   core models: momentum-conserving PKA velocity injection, neighbor shell ranking,
//!   RMSE evaluation, committee-based frame selection and external MD engine invocation.
//!
//! - **[`workflows`]: The Public API.** Path-level entry points that read input files,
//!   run an `engine` routine and write the results back out.

pub mod core;
pub mod engine;
pub mod workflows;
