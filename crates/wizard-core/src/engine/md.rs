use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum MdRunError {
    #[error("Working directory '{}' does not exist", .0.display())]
    MissingWorkdir(PathBuf),
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// An external molecular-dynamics engine that runs to completion inside a directory.
pub trait MdEngine {
    /// Runs one blocking simulation with `workdir` as the engine's working directory.
    fn run(&self, workdir: &Path) -> Result<ExitStatus, MdRunError>;
}

/// An [`MdEngine`] backed by a subprocess.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEngine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandEngine {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// GPUMD reads `run.in` and `model.xyz` from its working directory.
    pub fn gpumd() -> Self {
        Self::new("gpumd", Vec::<OsString>::new())
    }

    /// Serial LAMMPS driven by the given input script.
    pub fn lammps(input: impl Into<OsString>) -> Self {
        Self::new("lmp_serial", [OsString::from("-in"), input.into()])
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl MdEngine for CommandEngine {
    #[instrument(level = "debug", skip(self), fields(program = ?self.program))]
    fn run(&self, workdir: &Path) -> Result<ExitStatus, MdRunError> {
        if !workdir.is_dir() {
            return Err(MdRunError::MissingWorkdir(workdir.to_path_buf()));
        }
        info!(
            "Running {} in {}",
            self.program.to_string_lossy(),
            workdir.display()
        );
        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(workdir)
            .status()
            .map_err(|source| MdRunError::Launch {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;
        info!("{} finished with {}", self.program.to_string_lossy(), status);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[test]
    fn presets_build_expected_command_lines() {
        let gpumd = CommandEngine::gpumd();
        assert_eq!(gpumd.program(), "gpumd");
        assert!(gpumd.args().is_empty());

        let lammps = CommandEngine::lammps("in.cascade");
        assert_eq!(lammps.program(), "lmp_serial");
        assert_eq!(lammps.args(), ["-in", "in.cascade"]);
    }

    #[test]
    fn missing_workdir_is_reported_before_launch() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = CommandEngine::gpumd().run(&missing).unwrap_err();
        assert!(matches!(err, MdRunError::MissingWorkdir(p) if p == missing));
    }

    #[test]
    fn unknown_program_is_a_launch_error() {
        let dir = tempdir().unwrap();
        let engine = CommandEngine::new("definitely-not-an-md-engine", ["-in", "run.in"]);
        let err = engine.run(dir.path()).unwrap_err();
        assert!(matches!(err, MdRunError::Launch { ref program, .. } if program == "definitely-not-an-md-engine"));
    }

    #[cfg(unix)]
    #[test]
    fn command_runs_inside_workdir() {
        let dir = tempdir().unwrap();
        let engine = CommandEngine::new("sh", ["-c", "pwd > where.txt"]);

        let status = engine.run(dir.path()).unwrap();

        assert!(status.success());
        let recorded = std::fs::read_to_string(dir.path().join("where.txt")).unwrap();
        let recorded = std::fs::canonicalize(recorded.trim()).unwrap();
        assert_eq!(recorded, std::fs::canonicalize(dir.path()).unwrap());
    }

    struct RecordingEngine {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl MdEngine for RecordingEngine {
        fn run(&self, workdir: &Path) -> Result<ExitStatus, MdRunError> {
            self.calls.borrow_mut().push(workdir.to_path_buf());
            Ok(ExitStatus::default())
        }
    }

    #[test]
    fn engines_are_usable_as_trait_objects() {
        let recorder = RecordingEngine {
            calls: RefCell::new(Vec::new()),
        };
        let engine: &dyn MdEngine = &recorder;

        let status = engine.run(Path::new("cascade")).unwrap();

        assert!(status.success());
        assert_eq!(*recorder.calls.borrow(), [PathBuf::from("cascade")]);
    }
}
