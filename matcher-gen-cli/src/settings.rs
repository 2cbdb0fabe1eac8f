//! Generator settings from a TOML file and the command line.
//!
//! ```toml
//! generator_id = "com.example.build.Matchers"
//! indent = "    "
//! ```
//!
//! Missing keys keep their defaults. `--generator-id` wins over the file.

use crate::error::CliError;

use matcher_gen::GeneratorSettings;
use std::fs;
use std::path::Path;

pub fn load(
    path: Option<&Path>,
    generator_id: Option<&str>,
) -> Result<GeneratorSettings, CliError> {
    let mut settings = match path {
        Some(path) => {
            let input = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&input).map_err(|source| CliError::Settings {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => GeneratorSettings::default(),
    };

    if let Some(id) = generator_id {
        settings.generator_id = id.to_string();
    }
    settings.validate()?;

    tracing::debug!(generator_id = %settings.generator_id, "settings loaded");
    Ok(settings)
}
