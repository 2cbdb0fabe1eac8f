use clap::{ArgAction, Parser};
use std::path::PathBuf;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::Level;

/// Writes Hamcrest matcher sources for the types a declaration model
/// configures.
#[derive(Debug, Parser)]
#[command(name = "matcher-gen", bin_name = "matcher-gen", version)]
pub struct Cli {
    /// Declaration model and configurations, as JSON.
    #[arg(long, short = 'm', value_name = "PATH")]
    pub model: PathBuf,

    /// Generator settings, as TOML.
    #[arg(long, short = 's', value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Source root the matchers are written below.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: PathBuf,

    /// Stamp every matcher with this time instead of the current one.
    #[arg(long, value_name = "RFC3339", value_parser = parse_timestamp)]
    pub timestamp: Option<OffsetDateTime>,

    /// Overrides the generator id of the settings file.
    #[arg(long, value_name = "ID")]
    pub generator_id: Option<String>,

    /// More output; repeat for more.
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "matcher-gen",
            "--model",
            "model.json",
            "--settings",
            "settings.toml",
            "--out",
            "generated",
            "--timestamp",
            "2023-11-14T22:13:20Z",
            "--generator-id",
            "com.example.Gen",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.model, PathBuf::from("model.json"));
        assert_eq!(cli.settings, Some(PathBuf::from("settings.toml")));
        assert_eq!(cli.out, PathBuf::from("generated"));
        assert_eq!(
            cli.timestamp,
            Some(OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap())
        );
        assert_eq!(cli.generator_id.as_deref(), Some("com.example.Gen"));
        assert_eq!(cli.level(), Level::TRACE);
    }

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["matcher-gen", "-m", "model.json", "-o", "out"]).unwrap();

        assert_eq!(cli.settings, None);
        assert_eq!(cli.timestamp, None);
        assert_eq!(cli.level(), Level::INFO);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Cli::try_parse_from(["matcher-gen", "-m", "model.json"]).is_err());
        assert!(
            Cli::try_parse_from([
                "matcher-gen",
                "-m",
                "model.json",
                "-o",
                "out",
                "--timestamp",
                "yesterday",
            ])
            .is_err()
        );
    }
}
