pub mod defaults;

use crate::cli::{GroupArgs, PkaArgs};
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use mdwizard::core::models::group::BoundingBox;
use mdwizard::engine::pka::PkaSettings;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPkaConfig {
    energy: Option<f64>,
    direction: Option<[f64; 3]>,
    #[serde(rename = "target-atom")]
    target_atom: Option<usize>,
    #[serde(rename = "emit-group")]
    emit_group: Option<bool>,
    output: Option<PathBuf>,
}

/// Settings read from a `wizard.toml` file, every field optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pka: Option<PartialPkaConfig>,
    group: Option<BoundingBox>,
}

/// Fully resolved inputs of the `pka` command.
#[derive(Debug, Clone, PartialEq)]
pub struct PkaJob {
    pub settings: PkaSettings,
    pub output: PathBuf,
    pub emit_group: bool,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_pka(self, args: &PkaArgs) -> Result<PkaJob> {
        let file = self.pka.unwrap_or_default();
        let defaults = DefaultsConfig::default();

        let energy = args.energy.or(file.energy).ok_or_else(|| {
            CliError::Config(
                "A PKA energy is required, via `--energy` or `pka.energy`.".to_string(),
            )
        })?;
        let direction = args.direction.or(file.direction).ok_or_else(|| {
            CliError::Config(
                "A PKA direction is required, via `--direction` or `pka.direction`.".to_string(),
            )
        })?;
        let target_atom = args.target.or(file.target_atom).ok_or_else(|| {
            CliError::Config(
                "A target atom is required, via `--target` or `pka.target-atom`.".to_string(),
            )
        })?;
        if target_atom == 0 {
            return Err(CliError::Argument(
                "Target atom indices start at 1.".to_string(),
            ));
        }

        let emit_group = if args.no_group {
            false
        } else {
            file.emit_group.unwrap_or(defaults.emit_group)
        };
        let output = args
            .output
            .clone()
            .or(file.output)
            .unwrap_or(defaults.pka_output);

        Ok(PkaJob {
            settings: PkaSettings {
                energy,
                direction: Vector3::from(direction),
                target_atom,
            },
            output,
            emit_group,
        })
    }

    /// The `[group]` table supplies a whole box; `--min` and `--max` replace its corners.
    pub fn merge_group(self, args: &GroupArgs) -> Result<BoundingBox> {
        let file = self.group;

        let min = args
            .min
            .map(Point3::from)
            .or(file.map(|bbox| bbox.min))
            .ok_or_else(|| {
                CliError::Config("A lower corner is required, via `--min` or `group.min`.".to_string())
            })?;
        let max = args
            .max
            .map(Point3::from)
            .or(file.map(|bbox| bbox.max))
            .ok_or_else(|| {
                CliError::Config("An upper corner is required, via `--max` or `group.max`.".to_string())
            })?;

        Ok(BoundingBox::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("wizard.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn pka_args(extra: &[&str]) -> PkaArgs {
        let mut argv = vec!["wizard", "pka", "-i", "restart.xyz"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Pka(args) => args,
            _ => panic!("Expected 'pka' subcommand"),
        }
    }

    fn group_args(extra: &[&str]) -> GroupArgs {
        let mut argv = vec!["wizard", "group", "-i", "in.xyz", "-o", "out.xyz"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Group(args) => args,
            _ => panic!("Expected 'group' subcommand"),
        }
    }

    #[test]
    fn pka_values_come_from_file_and_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [pka]
            energy = 500.0
            direction = [0.0, 0.0, 1.0]
            target-atom = 12
            "#,
        );

        let job = PartialConfig::from_file(&path)
            .unwrap()
            .merge_pka(&pka_args(&[]))
            .unwrap();

        assert_eq!(job.settings.energy, 500.0);
        assert_eq!(job.settings.direction, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(job.settings.target_atom, 12);
        assert_eq!(job.output, PathBuf::from("model.xyz"));
        assert!(job.emit_group);
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [pka]
            energy = 500.0 # Will be overridden
            direction = [0.0, 0.0, 1.0]
            target-atom = 12
            emit-group = true
            output = "from-file.xyz"
            "#,
        );

        let args = pka_args(&[
            "--energy", "20", "--target", "3", "--no-group", "-o", "cli.xyz",
        ]);
        let job = PartialConfig::from_file(&path)
            .unwrap()
            .merge_pka(&args)
            .unwrap();

        assert_eq!(job.settings.energy, 20.0);
        assert_eq!(job.settings.target_atom, 3);
        assert_eq!(job.settings.direction, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(job.output, PathBuf::from("cli.xyz"));
        assert!(!job.emit_group);
    }

    #[test]
    fn missing_required_pka_value_is_a_config_error() {
        let args = pka_args(&["--energy", "1", "--direction", "1,0,0"]);
        let result = PartialConfig::default().merge_pka(&args);
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("target")));
    }

    #[test]
    fn zero_target_is_an_argument_error() {
        let args = pka_args(&["--energy", "1", "--direction", "1,0,0", "--target", "0"]);
        let result = PartialConfig::default().merge_pka(&args);
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn group_box_merges_file_and_cli() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [group]
            min = [1.0, 1.0, 1.0]
            max = [9.0, 9.0, 9.0]
            "#,
        );

        let bbox = PartialConfig::from_file(&path)
            .unwrap()
            .merge_group(&group_args(&["--max", "5,5,5"]))
            .unwrap();

        assert_eq!(bbox.min, Point3::new(1.0, 1.0, 1.0));
        assert_eq!(bbox.max, Point3::new(5.0, 5.0, 5.0));

        let result = PartialConfig::default().merge_group(&group_args(&["--min", "0,0,0"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn incomplete_group_table_is_a_parsing_error() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, "[group]\nmin = [0.0, 0.0, 0.0]\n");
        let result = PartialConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));

        let path = write_config(&dir, "[group]\nmin = [0.0, 0.0]\nmax = [1.0, 1.0, 1.0]\n");
        let result = PartialConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn group_box_comes_from_file_alone() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            "[group]\nmin = [0.5, 0.5, 0.5]\nmax = [7.5, 7.5, 7.5]\n",
        );
        let bbox = PartialConfig::from_file(&path)
            .unwrap()
            .merge_group(&group_args(&[]))
            .unwrap();
        assert_eq!(
            bbox,
            BoundingBox::new(Point3::new(0.5, 0.5, 0.5), Point3::new(7.5, 7.5, 7.5))
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, "[pka]\nenergy = 1.0\nangle = 3\n");
        let result = PartialConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn load_without_path_is_empty() {
        let config = PartialConfig::load(None).unwrap();
        assert!(config.pka.is_none());
        assert!(config.group.is_none());
    }
}
