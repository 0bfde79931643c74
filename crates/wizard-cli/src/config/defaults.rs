use mdwizard::workflows::pka::DEFAULT_OUTPUT;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub pka_output: PathBuf,
    pub emit_group: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pka_output: PathBuf::from(DEFAULT_OUTPUT),
            emit_group: true,
        }
    }
}
