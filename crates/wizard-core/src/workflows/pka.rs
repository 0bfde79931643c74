use crate::core::io::restart::{RestartFile, RestartWriteOptions};
use crate::core::io::traits::StructureFile;
use crate::engine::error::EngineError;
use crate::engine::pka::{self, PkaReport, PkaSettings};
use std::path::Path;
use tracing::{info, instrument};

/// File name under which the engine expects its starting configuration.
pub const DEFAULT_OUTPUT: &str = "model.xyz";

/// Reads a restart file, gives the target atom its PKA velocity while conserving the
/// total momentum, and writes the updated record to `output`.
///
/// Every atom line keeps its group tokens. With `emit_group` set, atom lines end in
/// `" \n"` as in the grouped layout; otherwise they end in a bare `"\n"`. Nothing is
/// written when reading or rebalancing fails.
#[instrument(skip_all, name = "pka_workflow", fields(input = %input.display()))]
pub fn run(
    input: &Path,
    output: &Path,
    settings: &PkaSettings,
    emit_group: bool,
) -> Result<PkaReport, EngineError> {
    let mut record = RestartFile::read_from_path(input).map_err(|source| EngineError::Restart {
        path: input.to_path_buf(),
        source,
    })?;
    info!("Loaded {} atoms from {}", record.atom_count(), input.display());

    let report = pka::rebalance(&mut record, settings)?;

    let options = RestartWriteOptions {
        trailing_space: emit_group,
    };
    RestartFile::write_to_path(&record, &options, output).map_err(|source| {
        EngineError::Restart {
            path: output.to_path_buf(),
            source,
        }
    })?;
    info!("Wrote PKA configuration to {}", output.display());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pka::{PkaError, VELOCITY_UNIT_FACTOR};
    use nalgebra::Vector3;
    use tempfile::tempdir;

    const RESTART: &str = "3 2 5.0 0 1 1\n\
        0 0 0 10.0 0 0 0 10.0 0 0 0 10.0\n\
        Fe  0.0  0.0  0.0  1.0 0.0 0.0 0.0 0\n\
        Fe  1.4  1.4  1.4  1.0 0.0 0.0 0.0 1\n\
        Fe  2.8  0.0  0.0  1.0 0.0 0.0 0.0 1\n";

    fn settings() -> PkaSettings {
        PkaSettings {
            energy: 1.0,
            direction: Vector3::new(1.0, 0.0, 0.0),
            target_atom: 1,
        }
    }

    #[test]
    fn run_writes_rebalanced_velocities() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("restart.xyz");
        let output = dir.path().join(DEFAULT_OUTPUT);
        std::fs::write(&input, RESTART).unwrap();

        let report = run(&input, &output, &settings(), true).unwrap();

        let written = RestartFile::read_from_path(&output).unwrap();
        let speed = 2.0_f64.sqrt() / VELOCITY_UNIT_FACTOR;
        assert!((written.atoms[0].velocity.x - speed).abs() < 1e-15);
        assert!((written.atoms[1].velocity.x + speed / 2.0).abs() < 1e-15);
        assert!((written.atoms[2].velocity.x + speed / 2.0).abs() < 1e-15);
        assert!(written.total_momentum().norm() < 1e-12);
        assert!(report.momentum_after.norm() < 1e-15);

        assert_eq!(written.header, "3 2 5.0 0 1 1");
        assert_eq!(written.atoms[2].leading, ["Fe", "2.8", "0.0", "0.0", "1.0"]);
        assert_eq!(written.atoms[2].group, ["1"]);
    }

    #[test]
    fn group_tag_is_kept_in_both_layouts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("restart.xyz");
        std::fs::write(&input, RESTART).unwrap();

        for emit_group in [true, false] {
            let output = dir.path().join(format!("model-{emit_group}.xyz"));
            run(&input, &output, &settings(), emit_group).unwrap();

            let content = std::fs::read_to_string(&output).unwrap();
            let atom_lines: Vec<&str> = content.lines().skip(2).collect();
            assert_eq!(atom_lines.len(), 3);
            for (line, tag) in atom_lines.iter().zip(["0", "1", "1"]) {
                assert_eq!(line.split_whitespace().count(), 9);
                assert_eq!(line.split_whitespace().last(), Some(tag));
                assert_eq!(line.ends_with(' '), emit_group);
            }
            assert_eq!(content.lines().next(), Some("3 2 5.0 0 1 1"));
        }
    }

    #[test]
    fn invalid_settings_leave_output_untouched() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("restart.xyz");
        let output = dir.path().join(DEFAULT_OUTPUT);
        std::fs::write(&input, RESTART).unwrap();

        let bad = PkaSettings {
            target_atom: 4,
            ..settings()
        };
        let err = run(&input, &output, &bad, true).unwrap_err();

        assert!(matches!(
            err,
            EngineError::Pka(PkaError::TargetOutOfRange { index: 4, count: 3 })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn unreadable_input_names_the_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("absent.xyz");
        let err = run(&input, &dir.path().join(DEFAULT_OUTPUT), &settings(), true).unwrap_err();
        assert!(matches!(err, EngineError::Restart { ref path, .. } if *path == input));
    }
}
