use crate::error::{CliError, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Maps the `-v` count onto a level. `--quiet` keeps errors only.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Creates the log file, along with any missing parent directory of a run folder.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(CliError::Io)?;
    }
    File::create(path).map_err(CliError::Io)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer);

    match log_file {
        Some(path) => {
            let file_layer = fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .with_target(true);
            subscriber.with(file_layer).init();
        }
        None => subscriber.init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{debug, error, info, warn};

    fn capture(filter: LevelFilter, emit: impl FnOnce()) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wizard.log");
        let file_layer = fmt::layer()
            .with_writer(open_log_file(&path).unwrap())
            .with_ansi(false);
        let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);
        tracing::subscriber::with_default(subscriber, emit);
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn verbosity_count_selects_level() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(3, false), LevelFilter::TRACE);
        assert_eq!(level_filter(9, false), LevelFilter::TRACE);
        assert_eq!(level_filter(2, true), LevelFilter::ERROR);
    }

    #[test]
    #[serial]
    fn quiet_keeps_only_errors() {
        let content = capture(level_filter(3, true), || {
            warn!("Target atom has a large velocity");
            error!("Restart file is truncated");
        });
        assert!(content.contains("Restart file is truncated"));
        assert!(!content.contains("large velocity"));
    }

    #[test]
    #[serial]
    fn single_verbose_flag_shows_momentum_but_not_debug() {
        let content = capture(level_filter(1, false), || {
            info!("Total momentum before PKA: 0 0 0");
            debug!("Found 3 shells within 4.5 Å");
        });
        assert!(content.contains("INFO"));
        assert!(content.contains("Total momentum before PKA"));
        assert!(!content.contains("shells"));
    }

    #[test]
    fn log_file_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cascade").join("logs").join("wizard.log");
        open_log_file(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    #[serial]
    fn directory_as_log_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(dir.path().to_path_buf()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
