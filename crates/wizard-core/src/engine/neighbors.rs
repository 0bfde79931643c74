use crate::core::models::frame::AtomicFrame;
use crate::core::utils::geometry::PeriodicCell;
use nalgebra::Vector3;
use thiserror::Error;
use tracing::{debug, instrument};

/// Search radius used when none is given: two 5.0 Å per-atom radii.
pub const DEFAULT_CUTOFF: f64 = 10.0;

const SHELL_ABS_TOLERANCE: f64 = 1e-8;
const SHELL_REL_TOLERANCE: f64 = 1e-5;

#[derive(Debug, Error, PartialEq)]
pub enum NeighborError {
    #[error("Atom index {index} is out of range for a frame of {count} atoms")]
    AtomOutOfRange { index: usize, count: usize },
    #[error("Cell is singular along a periodic axis")]
    SingularCell,
    #[error("Cutoff must be finite and non-negative, got {0}")]
    InvalidCutoff(f64),
}

/// Neighbors of one atom ordered by distance and grouped into shells.
///
/// On periodic axes an atom appears once per image inside the cutoff, so the same index
/// can occur in several shells.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborShells {
    shells: Vec<Vec<(usize, f64)>>,
}

impl NeighborShells {
    /// Number of distinct distance shells found within the cutoff.
    pub fn len(&self) -> usize {
        self.shells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    /// The `(atom index, distance)` pairs of shell `nth` (1-based).
    pub fn shell(&self, nth: usize) -> Option<&[(usize, f64)]> {
        nth.checked_sub(1)
            .and_then(|i| self.shells.get(i))
            .map(Vec::as_slice)
    }
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= SHELL_ABS_TOLERANCE + SHELL_REL_TOLERANCE * b.abs()
}

/// Groups every atom within `cutoff` of atom `index` (0-based) into distance shells.
///
/// Every periodic image within `cutoff` counts, including images of the central atom
/// itself, so cutoffs longer than half the cell are handled. A new shell starts
/// whenever two consecutive sorted distances are not numerically close.
#[instrument(level = "debug", skip(frame), fields(atoms = frame.len()))]
pub fn neighbor_shells(
    frame: &AtomicFrame,
    index: usize,
    cutoff: f64,
) -> Result<NeighborShells, NeighborError> {
    let count = frame.len();
    if index >= count {
        return Err(NeighborError::AtomOutOfRange { index, count });
    }
    if !cutoff.is_finite() || cutoff < 0.0 {
        return Err(NeighborError::InvalidCutoff(cutoff));
    }
    let cell = PeriodicCell::new(frame.cell(), frame.pbc()).ok_or(NeighborError::SingularCell)?;
    let translations = cell.image_translations(cutoff);

    let center = &frame.positions()[index];
    let mut neighbors: Vec<(usize, f64)> = Vec::new();
    for (j, p) in frame.positions().iter().enumerate() {
        let base = cell.minimum_image(p - center);
        for shift in &translations {
            if j == index && *shift == Vector3::zeros() {
                continue;
            }
            let d = (base + shift).norm();
            if d <= cutoff {
                neighbors.push((j, d));
            }
        }
    }
    neighbors.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let mut shells: Vec<Vec<(usize, f64)>> = Vec::new();
    for neighbor in neighbors {
        match shells.last_mut() {
            Some(shell) if shell.last().is_some_and(|last| is_close(last.1, neighbor.1)) => {
                shell.push(neighbor)
            }
            _ => shells.push(vec![neighbor]),
        }
    }
    debug!("Found {} shells within {} Å", shells.len(), cutoff);

    Ok(NeighborShells { shells })
}

/// Index of the first atom in the `nth` (1-based) neighbor shell of atom `index`.
///
/// Returns `Ok(None)` when `nth` is zero or fewer than `nth` shells lie within `cutoff`.
pub fn nth_nearest_neighbor(
    frame: &AtomicFrame,
    index: usize,
    nth: usize,
    cutoff: f64,
) -> Result<Option<usize>, NeighborError> {
    let shells = neighbor_shells(frame, index, cutoff)?;
    Ok(shells
        .shell(nth)
        .and_then(|shell| shell.first())
        .map(|&(j, _)| j))
}
