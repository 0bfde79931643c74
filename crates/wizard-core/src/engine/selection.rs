use crate::core::models::frame::AtomicFrame;
use nalgebra::Vector3;
use rand::Rng;
use rand::seq::index;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Anything that can predict per-atom forces for a frame, such as a trained potential.
pub trait ForceProvider {
    /// Forces on every atom of `frame`, in the frame's atom order.
    fn forces(&self, frame: &AtomicFrame) -> Vec<Vector3<f64>>;
}

impl<F> ForceProvider for F
where
    F: Fn(&AtomicFrame) -> Vec<Vector3<f64>>,
{
    fn forces(&self, frame: &AtomicFrame) -> Vec<Vector3<f64>> {
        self(frame)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("At least one committee potential is required")]
    EmptyCommittee,
    #[error("Force provider returned {found} forces for frame {frame} of {expected} atoms")]
    ForceCountMismatch {
        frame: usize,
        expected: usize,
        found: usize,
    },
    #[error("Error window is empty: min {min} is not below max {max}")]
    InvalidWindow { min: f64, max: f64 },
}

/// Window on the committee disagreement that marks a frame as worth retraining on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionCriteria {
    /// Exclusive lower bound on a force component difference (eV/Å).
    pub error_min: f64,
    /// Exclusive upper bound on a force component difference (eV/Å).
    pub error_max: f64,
    /// Upper limit on the number of frames returned.
    pub max_frames: usize,
}

impl SelectionCriteria {
    pub const DEFAULT_ERROR_MAX: f64 = 100.0;
    pub const DEFAULT_MAX_FRAMES: usize = 1_000_000;

    pub fn new(error_min: f64) -> Self {
        Self {
            error_min,
            error_max: Self::DEFAULT_ERROR_MAX,
            max_frames: Self::DEFAULT_MAX_FRAMES,
        }
    }

    fn accepts(&self, difference: f64) -> bool {
        difference > self.error_min && difference < self.error_max
    }
}

/// Picks the frames on which the committee disagrees with the main potential.
///
/// For each frame, every force component of every committee member is compared with the
/// main potential's prediction as the signed difference `f_member - f_main`. A frame is
/// selected when at least one difference lies strictly inside
/// `(error_min, error_max)`. If more than `max_frames` frames qualify, a uniform random
/// subset of that size is drawn from `rng`; the returned indices are always ascending.
///
/// # Errors
///
/// Fails on an empty committee, an empty error window, or a provider returning a force
/// list whose length differs from the frame's atom count.
#[instrument(level = "debug", skip_all, fields(frames = frames.len(), committee = committee.len()))]
pub fn select_frames<R: Rng + ?Sized>(
    frames: &[AtomicFrame],
    main: &dyn ForceProvider,
    committee: &[&dyn ForceProvider],
    criteria: &SelectionCriteria,
    rng: &mut R,
) -> Result<Vec<usize>, SelectionError> {
    if committee.is_empty() {
        return Err(SelectionError::EmptyCommittee);
    }
    if criteria.error_min.partial_cmp(&criteria.error_max) != Some(std::cmp::Ordering::Less) {
        return Err(SelectionError::InvalidWindow {
            min: criteria.error_min,
            max: criteria.error_max,
        });
    }

    let mut selected = Vec::new();
    for (i, frame) in frames.iter().enumerate() {
        let reference = checked_forces(main, frame, i)?;
        let mut hit = false;
        for member in committee {
            let forces = checked_forces(*member, frame, i)?;
            hit |= forces
                .iter()
                .zip(&reference)
                .any(|(f, f0)| (f - f0).iter().any(|&d| criteria.accepts(d)));
        }
        if hit {
            selected.push(i);
        }
    }
    debug!("{} of {} frames fall inside the error window", selected.len(), frames.len());

    if selected.len() > criteria.max_frames {
        let mut picked: Vec<usize> = index::sample(rng, selected.len(), criteria.max_frames)
            .into_iter()
            .map(|k| selected[k])
            .collect();
        picked.sort_unstable();
        selected = picked;
    }
    info!("Selected {} frames for retraining", selected.len());

    Ok(selected)
}

fn checked_forces(
    provider: &dyn ForceProvider,
    frame: &AtomicFrame,
    index: usize,
) -> Result<Vec<Vector3<f64>>, SelectionError> {
    let forces = provider.forces(frame);
    if forces.len() != frame.len() {
        return Err(SelectionError::ForceCountMismatch {
            frame: index,
            expected: frame.len(),
            found: forces.len(),
        });
    }
    Ok(forces)
}
