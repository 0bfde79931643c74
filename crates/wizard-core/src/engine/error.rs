use super::md::MdRunError;
use super::neighbors::NeighborError;
use super::pka::PkaError;
use super::selection::SelectionError;
use super::training::TrainingError;
use crate::core::io::restart::RestartError;
use crate::core::io::xyz::XyzError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to process structure file '{path}': {source}", path = path.display())]
    Xyz {
        path: PathBuf,
        #[source]
        source: XyzError,
    },

    #[error("Failed to process restart file '{path}': {source}", path = path.display())]
    Restart {
        path: PathBuf,
        #[source]
        source: RestartError,
    },

    #[error("Failed to open '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Frame {index} requested but '{path}' holds {count} frames", path = path.display())]
    FrameOutOfRange {
        path: PathBuf,
        index: usize,
        count: usize,
    },

    #[error("PKA setup failed: {0}")]
    Pka(#[from] PkaError),

    #[error("Training evaluation failed: {0}")]
    Training(#[from] TrainingError),

    #[error("Neighbor search failed: {0}")]
    Neighbor(#[from] NeighborError),

    #[error("Frame selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("MD engine failed: {0}")]
    MdRun(#[from] MdRunError),
}
