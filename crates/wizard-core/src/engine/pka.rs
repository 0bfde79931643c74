use crate::core::models::restart::RestartRecord;
use nalgebra::Vector3;
use thiserror::Error;
use tracing::{info, instrument};

/// Converts `sqrt(eV / amu)` into the velocity unit of the restart layout (Å/fs).
pub const VELOCITY_UNIT_FACTOR: f64 = 10.18;

#[derive(Debug, Error, PartialEq)]
pub enum PkaError {
    #[error("Invalid argument: at least 2 atoms are required to balance momentum, found {count}")]
    TooFewAtoms { count: usize },
    #[error("Invalid argument: target atom {index} is outside 1..={count}")]
    TargetOutOfRange { index: usize, count: usize },
    #[error("Invalid argument: PKA energy must be finite and non-negative, got {0}")]
    InvalidEnergy(f64),
    #[error("Invalid argument: direction must be a finite, non-zero vector, got {0:?}")]
    InvalidDirection([f64; 3]),
    #[error("Invalid argument: atom {index} has non-positive or non-finite mass {mass}")]
    InvalidMass { index: usize, mass: f64 },
}

/// Parameters of a primary knock-on atom setup.
#[derive(Debug, Clone, PartialEq)]
pub struct PkaSettings {
    /// Kinetic energy given to the PKA, in eV.
    pub energy: f64,
    /// Direction of the PKA velocity; need not be normalized.
    pub direction: Vector3<f64>,
    /// 1-based index of the PKA in the restart record.
    pub target_atom: usize,
}

/// Diagnostics of a rebalancing step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PkaReport {
    pub momentum_before: Vector3<f64>,
    pub momentum_after: Vector3<f64>,
    pub pka_velocity: Vector3<f64>,
}

/// Velocity of an atom of `mass` amu carrying `energy` eV along `direction`.
pub fn pka_velocity(energy: f64, mass: f64, direction: &Vector3<f64>) -> Vector3<f64> {
    (2.0 * energy / mass).sqrt() * direction / direction.norm() / VELOCITY_UNIT_FACTOR
}

/// Gives the target atom the PKA velocity and removes the injected momentum from
/// every other atom.
///
/// The momentum change of the target, `m * (v_new - v_old)`, is split evenly over the
/// remaining `N - 1` atoms and each of them loses its share divided by its own mass,
/// so the total momentum is unchanged.
///
/// # Errors
///
/// Returns a [`PkaError`] without touching `record` when the record has fewer than two
/// atoms, the target index is out of range, the energy or direction is unusable, or a
/// mass is not strictly positive.
#[instrument(level = "debug", skip_all, fields(target = settings.target_atom, energy = settings.energy))]
pub fn rebalance(record: &mut RestartRecord, settings: &PkaSettings) -> Result<PkaReport, PkaError> {
    validate(record, settings)?;

    let count = record.atom_count();
    let target = settings.target_atom - 1;

    let momentum_before = record.total_momentum();
    info!(
        "Total momentum before PKA: {:.10e} {:.10e} {:.10e}",
        momentum_before.x, momentum_before.y, momentum_before.z
    );

    let mass = record.atoms[target].mass;
    let velocity = pka_velocity(settings.energy, mass, &settings.direction);
    let delta = mass * (velocity - record.atoms[target].velocity) / (count - 1) as f64;

    for (i, atom) in record.atoms.iter_mut().enumerate() {
        if i != target {
            atom.velocity -= delta / atom.mass;
        }
    }
    record.atoms[target].velocity = velocity;

    let momentum_after = record.total_momentum();
    info!(
        "Total momentum after PKA: {:.10e} {:.10e} {:.10e}",
        momentum_after.x, momentum_after.y, momentum_after.z
    );

    Ok(PkaReport {
        momentum_before,
        momentum_after,
        pka_velocity: velocity,
    })
}

fn validate(record: &RestartRecord, settings: &PkaSettings) -> Result<(), PkaError> {
    let count = record.atom_count();
    if count < 2 {
        return Err(PkaError::TooFewAtoms { count });
    }
    if settings.target_atom == 0 || settings.target_atom > count {
        return Err(PkaError::TargetOutOfRange {
            index: settings.target_atom,
            count,
        });
    }
    if !settings.energy.is_finite() || settings.energy < 0.0 {
        return Err(PkaError::InvalidEnergy(settings.energy));
    }
    let norm = settings.direction.norm();
    if !norm.is_finite() || norm == 0.0 {
        return Err(PkaError::InvalidDirection(settings.direction.into()));
    }
    if let Some((i, atom)) = record
        .atoms
        .iter()
        .enumerate()
        .find(|(_, atom)| !atom.mass.is_finite() || atom.mass <= 0.0)
    {
        return Err(PkaError::InvalidMass {
            index: i + 1,
            mass: atom.mass,
        });
    }
    Ok(())
}
