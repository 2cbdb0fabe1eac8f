//! Command line host: loads a declaration model from JSON, runs one round and
//! writes the matchers below an output directory.

mod cli;
mod error;
mod settings;

use crate::cli::Cli;
use crate::error::CliError;

use clap::Parser;
use matcher_gen::model::ModelDocument;
use matcher_gen::{
    Diagnostic, DirectorySink, FixedClock, MatcherGenerator, RoundReport, Severity,
};
use std::fs;
use tracing::info;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.level())
        .with_writer(std::io::stderr)
        .init();

    let report = run(&cli)?;
    for name in &report.generated {
        println!("{name}");
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<RoundReport, CliError> {
    let settings = settings::load(cli.settings.as_deref(), cli.generator_id.as_deref())?;

    let input = fs::read_to_string(&cli.model).map_err(|source| CliError::Read {
        path: cli.model.clone(),
        source,
    })?;
    let (model, configurations) = ModelDocument::from_json(&input)
        .and_then(ModelDocument::into_parts)
        .map_err(|source| CliError::Model {
            path: cli.model.clone(),
            source,
        })?;
    info!(
        types = model.len(),
        configurations = configurations.len(),
        "declaration model loaded"
    );

    let mut generator = MatcherGenerator::new(&model, settings)?;
    if let Some(at) = cli.timestamp {
        generator = generator.with_clock(FixedClock(at));
    }

    let mut sink = DirectorySink::new(cli.out.clone());
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = generator.process(&configurations, &mut diagnostics, &mut sink)?;

    let warnings = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Warning)
        .count();
    info!(
        generated = report.generated.len(),
        warnings,
        out = %cli.out.display(),
        "round finished"
    );
    Ok(report)
}
