use super::element::standard_mass;
use super::group::{BoundingBox, Group};
use nalgebra::{Matrix3, Point3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("Inconsistent frame: {species} species but {found} {field}")]
    LengthMismatch {
        field: &'static str,
        species: usize,
        found: usize,
    },
    #[error("Unknown element symbol '{0}' has no standard atomic mass")]
    UnknownElement(String),
}

/// A single snapshot of an atomic structure.
///
/// All per-atom sequences are index-aligned: atom `i` has symbol `species()[i]`,
/// position `positions()[i]`, mass `masses()[i]` and, when present, group
/// `groups()[i]`. Constructors and mutators enforce this invariant, which is why the
/// fields are private.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicFrame {
    species: Vec<String>,
    positions: Vec<Point3<f64>>,
    masses: Vec<f64>,
    cell: Matrix3<f64>,
    pbc: [bool; 3],
    groups: Option<Vec<Group>>,
}

impl AtomicFrame {
    /// Creates a frame whose masses are taken from the standard atomic weights.
    ///
    /// # Arguments
    ///
    /// * `species` - Element symbols in title case (e.g. `"Fe"`).
    /// * `positions` - Cartesian coordinates, one per symbol.
    /// * `cell` - Lattice matrix whose rows are the three lattice vectors.
    /// * `pbc` - Periodicity flag for each lattice direction.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::LengthMismatch`] if `positions` does not match `species`,
    /// or [`FrameError::UnknownElement`] if a symbol has no tabulated mass.
    pub fn new(
        species: Vec<String>,
        positions: Vec<Point3<f64>>,
        cell: Matrix3<f64>,
        pbc: [bool; 3],
    ) -> Result<Self, FrameError> {
        let masses = species
            .iter()
            .map(|symbol| {
                standard_mass(symbol).ok_or_else(|| FrameError::UnknownElement(symbol.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_masses(species, positions, masses, cell, pbc)
    }

    /// Creates a frame with explicit per-atom masses.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::LengthMismatch`] if `positions` or `masses` do not match
    /// the number of species.
    pub fn with_masses(
        species: Vec<String>,
        positions: Vec<Point3<f64>>,
        masses: Vec<f64>,
        cell: Matrix3<f64>,
        pbc: [bool; 3],
    ) -> Result<Self, FrameError> {
        check_len("positions", species.len(), positions.len())?;
        check_len("masses", species.len(), masses.len())?;
        Ok(Self {
            species,
            positions,
            masses,
            cell,
            pbc,
            groups: None,
        })
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn cell(&self) -> &Matrix3<f64> {
        &self.cell
    }

    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    pub fn groups(&self) -> Option<&[Group]> {
        self.groups.as_deref()
    }

    /// Attaches one group tag per atom.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::LengthMismatch`] if `groups` does not have one entry per atom.
    pub fn set_groups(&mut self, groups: Vec<Group>) -> Result<(), FrameError> {
        check_len("groups", self.species.len(), groups.len())?;
        self.groups = Some(groups);
        Ok(())
    }

    pub fn clear_groups(&mut self) {
        self.groups = None;
    }

    /// Tags every atom by its position relative to `bbox` (see [`BoundingBox::classify`]).
    pub fn assign_groups(&mut self, bbox: &BoundingBox) {
        self.groups = Some(self.positions.iter().map(|p| bbox.classify(p)).collect());
    }

    /// Returns the cell flattened row by row: `a1 a2 a3 b1 b2 b3 c1 c2 c3`.
    pub fn lattice_row_major(&self) -> [f64; 9] {
        let mut flat = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                flat[row * 3 + col] = self.cell[(row, col)];
            }
        }
        flat
    }

    /// Summarizes the composition as `<symbol><count>` pairs in order of first
    /// appearance, e.g. `Fe2C1` for `[Fe, C, Fe]`.
    pub fn formula(&self) -> String {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for symbol in &self.species {
            match counts.iter_mut().find(|(s, _)| *s == symbol.as_str()) {
                Some((_, count)) => *count += 1,
                None => counts.push((symbol.as_str(), 1)),
            }
        }
        counts
            .iter()
            .map(|(symbol, count)| format!("{}{}", symbol, count))
            .collect()
    }
}

fn check_len(field: &'static str, species: usize, found: usize) -> Result<(), FrameError> {
    if species == found {
        Ok(())
    } else {
        Err(FrameError::LengthMismatch {
            field,
            species,
            found,
        })
    }
}
