use crate::engine::error::EngineError;
use crate::engine::training::{self, TrainingRmse};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::instrument;

pub const ENERGY_FILE: &str = "energy_train.out";
pub const FORCE_FILE: &str = "force_train.out";
pub const VIRIAL_FILE: &str = "virial_train.out";

fn open(dir: &Path, name: &str) -> Result<BufReader<File>, EngineError> {
    let path = dir.join(name);
    File::open(&path)
        .map(BufReader::new)
        .map_err(|source| EngineError::Io { path, source })
}

/// Evaluates the energy, force and virial RMSE from the training outputs in `dir`.
#[instrument(skip_all, name = "training_workflow", fields(dir = %dir.display()))]
pub fn run(dir: &Path) -> Result<TrainingRmse, EngineError> {
    let energy = open(dir, ENERGY_FILE)?;
    let force = open(dir, FORCE_FILE)?;
    let virial = open(dir, VIRIAL_FILE)?;
    Ok(training::evaluate(energy, force, virial)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn run_reads_the_three_training_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(ENERGY_FILE), "-8.1 -8.0\n-8.2 -8.3\n").unwrap();
        std::fs::write(dir.path().join(FORCE_FILE), "0.5 0 0 0.5 0 0\n").unwrap();
        std::fs::write(
            dir.path().join(VIRIAL_FILE),
            "1 1 1 1 1 1 1 1 1 1 1 1\n",
        )
        .unwrap();

        let rmse = run(dir.path()).unwrap();

        assert!((rmse.energy - 0.1).abs() < 1e-9);
        assert_eq!(rmse.force, 0.0);
        assert_eq!(rmse.virial, Some(0.0));
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(ENERGY_FILE), "1 1\n").unwrap();

        let err = run(dir.path()).unwrap_err();

        assert!(matches!(err, EngineError::Io { ref path, .. } if path.ends_with(FORCE_FILE)));
    }
}
