// Common test utilities

#![allow(dead_code)]

use matcher_gen::model::InMemoryModel;
use matcher_gen::{
    Diagnostic, FixedClock, GeneratedUnit, GeneratorSettings, MatcherConfiguration,
    MatcherGenerator, RoundReport, Severity,
};
use time::OffsetDateTime;

pub const CONFIG: &str = "com.example.Config";

/// 2023-11-14T22:13:20Z
pub fn clock() -> FixedClock {
    FixedClock(OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap())
}

pub struct Round {
    pub report: RoundReport,
    pub units: Vec<GeneratedUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Round {
    pub fn unit(&self, qualified_name: &str) -> &GeneratedUnit {
        self.units
            .iter()
            .find(|unit| unit.qualified_name() == qualified_name)
            .unwrap_or_else(|| panic!("no unit named {qualified_name}"))
    }

    pub fn unit_names(&self) -> Vec<String> {
        self.units.iter().map(GeneratedUnit::qualified_name).collect()
    }

    /// Messages of the given severity, the round's start note excluded.
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .map(|diagnostic| diagnostic.message.as_str())
            .filter(|message| *message != "Matcher generation started")
            .collect()
    }
}

pub fn config(names: &[&str]) -> MatcherConfiguration {
    MatcherConfiguration::new(CONFIG, names.iter().copied())
}

pub fn run(model: &InMemoryModel, configurations: &[MatcherConfiguration]) -> Round {
    run_with(model, GeneratorSettings::default(), configurations)
}

pub fn run_with(
    model: &InMemoryModel,
    settings: GeneratorSettings,
    configurations: &[MatcherConfiguration],
) -> Round {
    let generator = MatcherGenerator::new(model, settings)
        .unwrap()
        .with_clock(clock());
    let mut units: Vec<GeneratedUnit> = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = generator
        .process(configurations, &mut diagnostics, &mut units)
        .unwrap();
    Round {
        report,
        units,
        diagnostics,
    }
}

/// Number of declarations of `signature` in `source`.
pub fn count(source: &str, signature: &str) -> usize {
    source.matches(signature).count()
}
