//! # Engine Module
//!
//! Algorithms operating on the core data models. Every routine is synchronous and takes
//! its inputs (including random sources and external collaborators) as explicit
//! parameters.
//!
//! - [`pka`] - Momentum-conserving velocity injection for a primary knock-on atom
//! - [`neighbors`] - Distance-shell ranking of the neighbors of one atom
//! - [`training`] - RMSE summaries of a trained potential against reference data
//! - [`selection`] - Committee-disagreement selection of frames for retraining
//! - [`md`] - Capability interface for invoking an external MD engine
//! - [`error`] - The aggregate error type returned by workflows

pub mod error;
pub mod md;
pub mod neighbors;
pub mod pka;
pub mod selection;
pub mod training;
