use crate::utils::parser::parse_triplet;
use clap::{Args, Parser, Subcommand, ValueEnum};
use mdwizard::engine::neighbors::DEFAULT_CUTOFF;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "MD Wizard CLI - utilities for preparing and analysing molecular-dynamics and machine-learned-potential runs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Give one atom of a restart file a PKA velocity while conserving total momentum.
    Pka(PkaArgs),
    /// Tag the atoms of an extended-XYZ frame by their position relative to a box.
    Group(GroupArgs),
    /// Summarize the frames of an extended-XYZ trajectory.
    Info(InfoArgs),
    /// Find the first atom in the n-th neighbor shell of an atom.
    Neighbor(NeighborArgs),
    /// Report the energy, force and virial RMSE of a training run.
    Rmse(RmseArgs),
    /// Run an external MD engine to completion inside a working directory.
    Run(RunArgs),
}

/// Arguments for the `pka` subcommand.
#[derive(Args, Debug)]
pub struct PkaArgs {
    /// Path to the input restart file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the rebalanced output file [default: model.xyz].
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// PKA kinetic energy in eV, overriding the config file.
    #[arg(short, long, value_name = "FLOAT")]
    pub energy: Option<f64>,

    /// PKA direction as 'x,y,z', overriding the config file.
    #[arg(short, long, value_name = "X,Y,Z", value_parser = parse_triplet, allow_hyphen_values = true)]
    pub direction: Option<[f64; 3]>,

    /// 1-based index of the PKA atom, overriding the config file.
    #[arg(short, long, value_name = "INT")]
    pub target: Option<usize>,

    /// End atom lines without the trailing space of the grouped layout. Group tags are kept.
    #[arg(long)]
    pub no_group: bool,
}

/// Arguments for the `group` subcommand.
#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Path to the input extended-XYZ file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the grouped output file. Existing content is replaced.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// 0-based index of the frame to group.
    #[arg(short, long, default_value_t = 0, value_name = "INT")]
    pub frame: usize,

    /// Lower box corner as 'x,y,z', overriding the config file.
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_triplet, allow_hyphen_values = true)]
    pub min: Option<[f64; 3]>,

    /// Upper box corner as 'x,y,z', overriding the config file.
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_triplet, allow_hyphen_values = true)]
    pub max: Option<[f64; 3]>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the input extended-XYZ file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}

/// Arguments for the `neighbor` subcommand.
#[derive(Args, Debug)]
pub struct NeighborArgs {
    /// Path to the input extended-XYZ file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// 0-based index of the central atom.
    #[arg(short, long, required = true, value_name = "INT")]
    pub atom: usize,

    /// Which neighbor shell to report (1 is the nearest).
    #[arg(short, long, required = true, value_name = "INT")]
    pub nth: usize,

    /// Search radius in Angstrom.
    #[arg(long, default_value_t = DEFAULT_CUTOFF, value_name = "FLOAT")]
    pub cutoff: f64,

    /// 0-based index of the frame to inspect.
    #[arg(short, long, default_value_t = 0, value_name = "INT")]
    pub frame: usize,
}

/// Arguments for the `rmse` subcommand.
#[derive(Args, Debug)]
pub struct RmseArgs {
    /// Directory holding energy_train.out, force_train.out and virial_train.out.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub dir: PathBuf,
}

/// External MD engines known to the `run` subcommand.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// GPUMD, reading `run.in` from the working directory.
    Gpumd,
    /// Serial LAMMPS, reading the script given by `--script`.
    Lammps,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Working directory of the engine.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub dir: PathBuf,

    /// Which engine to launch.
    #[arg(short, long, value_enum, default_value_t = EngineKind::Gpumd)]
    pub engine: EngineKind,

    /// LAMMPS input script, relative to the working directory.
    #[arg(short, long, value_name = "FILE", required_if_eq("engine", "lammps"))]
    pub script: Option<PathBuf>,

    /// A run.in keyword line written before launching GPUMD. Can be used multiple times.
    #[arg(short, long = "param", value_name = "LINE")]
    pub params: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pka_arguments_parse_negative_direction() {
        let cli = Cli::parse_from([
            "wizard", "pka", "-i", "restart.xyz", "--energy", "100", "--direction", "-1,0,0.5",
            "--target", "3", "--no-group",
        ]);
        let Commands::Pka(args) = cli.command else {
            panic!("Expected 'pka' subcommand");
        };
        assert_eq!(args.input, PathBuf::from("restart.xyz"));
        assert_eq!(args.energy, Some(100.0));
        assert_eq!(args.direction, Some([-1.0, 0.0, 0.5]));
        assert_eq!(args.target, Some(3));
        assert!(args.no_group);
        assert!(args.output.is_none());
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::parse_from(["wizard", "rmse", "-vv", "--log-file", "run.log"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        let Commands::Rmse(args) = cli.command else {
            panic!("Expected 'rmse' subcommand");
        };
        assert_eq!(args.dir, PathBuf::from("."));
    }

    #[test]
    fn neighbor_defaults_cutoff_and_frame() {
        let cli = Cli::parse_from(["wizard", "neighbor", "-i", "a.xyz", "--atom", "0", "--nth", "2"]);
        let Commands::Neighbor(args) = cli.command else {
            panic!("Expected 'neighbor' subcommand");
        };
        assert_eq!(args.cutoff, DEFAULT_CUTOFF);
        assert_eq!(args.frame, 0);
        assert_eq!(args.nth, 2);
    }

    #[test]
    fn run_requires_a_script_for_lammps() {
        let result = Cli::try_parse_from(["wizard", "run", "--engine", "lammps"]);
        assert!(result.is_err());

        let cli = Cli::parse_from([
            "wizard", "run", "-d", "cascade", "-p", "time_step 1", "-p", "run 1000",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("Expected 'run' subcommand");
        };
        assert_eq!(args.engine, EngineKind::Gpumd);
        assert_eq!(args.params, ["time_step 1", "run 1000"]);
    }

    #[test]
    fn malformed_triplet_is_rejected() {
        let result = Cli::try_parse_from([
            "wizard", "group", "-i", "a.xyz", "-o", "b.xyz", "--min", "1,2",
        ]);
        assert!(result.is_err());
    }
}
