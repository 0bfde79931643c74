use crate::cli::{EngineKind, RunArgs};
use crate::error::{CliError, Result};
use mdwizard::core::io::run_input::{RUN_INPUT_FILE, write_run_input};
use mdwizard::engine::error::EngineError;
use mdwizard::engine::md::{CommandEngine, MdEngine, MdRunError};
use tracing::{info, warn};

pub fn run(args: RunArgs) -> Result<()> {
    let engine = match args.engine {
        EngineKind::Gpumd => CommandEngine::gpumd(),
        EngineKind::Lammps => {
            let script = args.script.clone().ok_or_else(|| {
                CliError::Argument("LAMMPS needs an input script (--script).".to_string())
            })?;
            CommandEngine::lammps(script)
        }
    };
    let program = engine.program().to_string_lossy().into_owned();
    execute(&engine, &program, &args)
}

fn execute(engine: &dyn MdEngine, program: &str, args: &RunArgs) -> Result<()> {
    if !args.params.is_empty() && args.engine != EngineKind::Gpumd {
        return Err(CliError::Argument(
            "--param writes run.in and is only used by GPUMD.".to_string(),
        ));
    }
    if !args.dir.is_dir() {
        return Err(EngineError::from(MdRunError::MissingWorkdir(args.dir.clone())).into());
    }

    if !args.params.is_empty() {
        let path = args.dir.join(RUN_INPUT_FILE);
        write_run_input(&path, &args.params).map_err(|source| EngineError::Io {
            path: path.clone(),
            source,
        })?;
        info!("Wrote {} parameters to {}", args.params.len(), path.display());
    }

    let status = engine.run(&args.dir).map_err(EngineError::from)?;
    if !status.success() {
        warn!("Engine exited with {}", status);
        return Err(CliError::EngineFailed {
            program: program.to_string(),
            status,
        });
    }
    println!("Engine finished in {}", args.dir.display());
    Ok(())
}
