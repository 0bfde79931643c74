//! Data structures describing atomic configurations.

pub mod element;
pub mod frame;
pub mod group;
pub mod restart;
