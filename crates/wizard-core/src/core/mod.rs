//! # Core Module
//!
//! Data models, file formats and geometry helpers shared by every algorithm in the
//! crate.
//!
//! - **Structure Representation** ([`models`]) - Frames, atom groups, restart records and
//!   the element table
//! - **File I/O** ([`io`]) - Extended-XYZ and restart codecs behind a common trait, plus the
//!   engine parameter file writer
//! - **Geometry** ([`utils`]) - Periodic minimum-image displacements

pub mod io;
pub mod models;
pub mod utils;
