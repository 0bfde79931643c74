use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Conventional name of the engine parameter file.
pub const RUN_INPUT_FILE: &str = "run.in";

/// Writes engine parameters one per line, replacing any existing file.
///
/// Each entry is a complete keyword line (e.g. `"time_step 1"`); no validation of
/// the keywords is performed.
pub fn write_run_input<P, S>(path: P, parameters: &[S]) -> io::Result<()>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    for parameter in parameters {
        writeln!(writer, "{}", parameter.as_ref())?;
    }
    writer.flush()
}
