use std::io::{self, BufRead};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Columns of an energy row: predicted, reference.
pub const ENERGY_COLUMNS: usize = 2;
/// Columns of a force row: predicted xyz, reference xyz.
pub const FORCE_COLUMNS: usize = 6;
/// Columns of a virial row: six predicted components, six reference components.
pub const VIRIAL_COLUMNS: usize = 12;
/// Marker written for virial components that have no reference value.
pub const VIRIAL_SENTINEL: f64 = -1e6;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid float on line {line} (value: '{value}')")]
    InvalidFloat { line: usize, value: String },
    #[error("No usable {quantity} rows were found")]
    Empty { quantity: &'static str },
}

/// Paired predicted and reference values read from one training output file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Residuals {
    predicted: Vec<f64>,
    reference: Vec<f64>,
}

impl Residuals {
    /// Reads rows of exactly `columns` whitespace-separated floats.
    ///
    /// The first half of each row is the prediction and the second half the reference,
    /// component by component. Rows with any other column count are skipped.
    pub fn read(reader: impl BufRead, columns: usize) -> Result<Self, TrainingError> {
        let half = columns / 2;
        let mut residuals = Self::default();
        let mut skipped = 0usize;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != columns {
                if !tokens.is_empty() {
                    skipped += 1;
                }
                continue;
            }
            let row = tokens
                .iter()
                .map(|t| {
                    t.parse::<f64>().map_err(|_| TrainingError::InvalidFloat {
                        line: i + 1,
                        value: t.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            residuals.predicted.extend_from_slice(&row[..half]);
            residuals.reference.extend_from_slice(&row[half..]);
        }

        if skipped > 0 {
            debug!("Skipped {} rows without {} columns", skipped, columns);
        }
        Ok(residuals)
    }

    pub fn len(&self) -> usize {
        self.predicted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicted.is_empty()
    }

    /// Drops every pair in which either value equals `sentinel`.
    pub fn exclude(&mut self, sentinel: f64) {
        let (predicted, reference) = self
            .predicted
            .iter()
            .zip(&self.reference)
            .filter(|&(&p, &r)| p != sentinel && r != sentinel)
            .map(|(&p, &r)| (p, r))
            .unzip();
        self.predicted = predicted;
        self.reference = reference;
    }

    /// Root-mean-square difference, or `None` when there are no pairs.
    pub fn rmse(&self) -> Option<f64> {
        rmse(&self.predicted, &self.reference)
    }
}

/// Root-mean-square difference of two equally long sequences.
///
/// Returns `None` for empty input. Extra trailing elements of the longer slice are
/// ignored.
pub fn rmse(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n == 0 {
        return None;
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    Some((sum / n as f64).sqrt())
}

/// RMSE of a trained potential against its training set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRmse {
    /// eV/atom.
    pub energy: f64,
    /// eV/Å.
    pub force: f64,
    /// eV/atom; `None` when no frame carries a reference virial.
    pub virial: Option<f64>,
}

/// Computes energy, force and virial RMSE from the three training output streams.
///
/// # Errors
///
/// Returns [`TrainingError::Empty`] when the energy or force stream has no complete
/// row, and propagates read and float parsing failures.
#[instrument(level = "debug", skip_all)]
pub fn evaluate(
    energy: impl BufRead,
    force: impl BufRead,
    virial: impl BufRead,
) -> Result<TrainingRmse, TrainingError> {
    let energy = Residuals::read(energy, ENERGY_COLUMNS)?
        .rmse()
        .ok_or(TrainingError::Empty { quantity: "energy" })?;
    let force = Residuals::read(force, FORCE_COLUMNS)?
        .rmse()
        .ok_or(TrainingError::Empty { quantity: "force" })?;

    let mut virials = Residuals::read(virial, VIRIAL_COLUMNS)?;
    let total = virials.len();
    virials.exclude(VIRIAL_SENTINEL);
    if virials.len() < total {
        debug!("Excluded {} virial components without reference", total - virials.len());
    }
    let virial = virials.rmse();
    if virial.is_none() {
        warn!("No virial components with a reference value; virial RMSE is undefined");
    }

    info!("Energy RMSE: {:.6} eV/atom", energy);
    info!("Force RMSE: {:.6} eV/A", force);
    if let Some(v) = virial {
        info!("Virial RMSE: {:.6} eV/atom", v);
    }

    Ok(TrainingRmse {
        energy,
        force,
        virial,
    })
}
