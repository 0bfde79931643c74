use crate::core::io::traits::StructureFile;
use crate::core::io::xyz::ExtXyzFile;
use crate::core::models::frame::AtomicFrame;
use crate::core::models::group::BoundingBox;
use crate::engine::error::EngineError;
use std::path::Path;
use tracing::{info, instrument};

/// Reads every frame of an extended-XYZ trajectory.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_frames(path: &Path) -> Result<Vec<AtomicFrame>, EngineError> {
    let frames = ExtXyzFile::read_from_path(path).map_err(|source| EngineError::Xyz {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Read {} frames from {}", frames.len(), path.display());
    Ok(frames)
}

/// Reads frame `index` (0-based) of an extended-XYZ trajectory.
pub fn read_frame(path: &Path, index: usize) -> Result<AtomicFrame, EngineError> {
    let mut frames = read_frames(path)?;
    let count = frames.len();
    if index >= count {
        return Err(EngineError::FrameOutOfRange {
            path: path.to_path_buf(),
            index,
            count,
        });
    }
    Ok(frames.swap_remove(index))
}

/// Tags the atoms of frame `index` of `input` by their position relative to `bbox` and
/// writes that single frame to `output`, replacing its content.
///
/// Returns the grouped frame.
#[instrument(level = "debug", skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn write_grouped(
    input: &Path,
    output: &Path,
    index: usize,
    bbox: &BoundingBox,
) -> Result<AtomicFrame, EngineError> {
    let mut frame = read_frame(input, index)?;
    ExtXyzFile::write_grouped_to_path(output, &frame, bbox).map_err(|source| {
        EngineError::Xyz {
            path: output.to_path_buf(),
            source,
        }
    })?;
    frame.assign_groups(bbox);
    info!("Wrote grouped frame of {} atoms to {}", frame.len(), output.display());
    Ok(frame)
}
