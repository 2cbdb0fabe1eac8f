//! # matcher-gen: Hamcrest Matchers for Java Types
//!
//! `matcher-gen` reads a graph of Java type declarations and writes, for every
//! configured type, a companion matcher class with one fluent `with<Property>`
//! assertion per bean property. Generated matchers extend Hamcrest's
//! `TypeSafeMatcher` and delegate to a `BeanPropertyMatcher` at test time.
//!
//! The crate is the generation engine only. A host (a compiler plugin, a build
//! tool or the bundled command line tool) supplies the declarations, the
//! configurations and a place to write sources to.
//!
//! # Table of Contents
//!
//! - [Quick Start](#quick-start)
//! - [A Generation Round](#a-generation-round)
//! - [Configurations](#configurations)
//! - [Properties](#properties)
//! - [Nested Types](#nested-types)
//! - [Regenerating](#regenerating)
//! - [Diagnostics](#diagnostics)
//!
//! # Quick Start
//!
//! ```rust
//! use matcher_gen::model::{InMemoryModel, TypeDef};
//! use matcher_gen::{
//!     Diagnostic, FixedClock, GeneratedUnit, GeneratorSettings, MatcherConfiguration,
//!     MatcherGenerator,
//! };
//! use time::OffsetDateTime;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = InMemoryModel::builder()
//!     .type_def(
//!         TypeDef::new("com.example.model.Person")
//!             .method("getName", "java.lang.String")
//!             .method("isAdult", "boolean"),
//!     )
//!     .build()?;
//!
//! let generator = MatcherGenerator::new(&model, GeneratorSettings::default())?
//!     .with_clock(FixedClock(OffsetDateTime::from_unix_timestamp(1_700_000_000)?));
//!
//! let configurations = [MatcherConfiguration::new(
//!     "com.example.Config",
//!     ["com.example.model"],
//! )];
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let mut units: Vec<GeneratedUnit> = Vec::new();
//! generator.process(&configurations, &mut diagnostics, &mut units)?;
//!
//! assert_eq!(units.len(), 1);
//! assert_eq!(units[0].qualified_name(), "com.example.model.PersonMatcher");
//! assert!(units[0].source.contains("public PersonMatcher withName(final String value) {"));
//! assert!(units[0].source.contains("public static PersonMatcher isPerson() {"));
//! # Ok(())
//! # }
//! ```
//!
//! # A Generation Round
//!
//! [`MatcherGenerator::process`] runs one round:
//!
//! 1. every configured name is resolved to top-level types
//! 2. types already stamped by this generator are dropped
//! 3. public nested types of the remaining ones are collected, so nested
//!    matchers can be generated for them; stamped nested types are dropped too
//! 4. properties are extracted and one source unit per remaining top-level
//!    type is rendered and handed to the [`EmissionSink`]
//!
//! All timestamps of a round are taken from a single reading of the
//! [`TimeSource`]. With a [`FixedClock`] two rounds over the same declarations
//! produce byte-identical sources.
//!
//! # Configurations
//!
//! A [`MatcherConfiguration`] names packages and types. A package contributes
//! the types declared directly in it; subpackages are separate packages. A
//! type contributes its outermost enclosing type, since nested types only ever
//! get matchers nested inside their enclosing type's matcher. A name that is
//! both a package and a type contributes both. Names resolving to nothing
//! produce a warning and are otherwise ignored.
//!
//! # Properties
//!
//! A property is read through a public, non-static method without parameters
//! whose name is `get<Name>` returning anything but `boolean`, or `is<Name>`
//! returning `boolean`. Inherited accessors count too: the superclass chain is
//! searched before interfaces, and an accessor declared closer to the type
//! hides one with the same property name further up.
//!
//! ```text
//! int getCount()        -> count
//! boolean isActive()    -> active
//! boolean getActive()   -> (not a property)
//! Boolean isActive()    -> (not a property)
//! ```
//!
//! # Nested Types
//!
//! Each public nested type gets a `public static` matcher class inside the
//! enclosing matcher. Non-public nested types are reported with a note and
//! neither they nor anything declared inside them get matchers.
//!
//! # Regenerating
//!
//! Every generated class carries `@Generated(value = <generator id>, date =
//! <timestamp>)`. When a later round sees a type whose marker names this
//! generator, typically because a configuration lists a whole package the
//! matchers were written to, the type is skipped with a note instead of
//! producing a matcher of a matcher.
//!
//! # Diagnostics
//!
//! Diagnostics go to a [`DiagnosticSink`] and are mirrored to `tracing`. Host
//! failures such as an unwritable output directory abort the round with a
//! [`GenerationError`].

pub mod clock;
pub mod config;
pub mod diag;
pub mod emit;
pub mod error;
pub mod expand;
pub mod guard;
pub mod java;
pub mod matcher;
pub mod model;
pub mod property;
pub mod resolve;

pub use clock::{FixedClock, SystemClock, TimeSource};
pub use config::{GeneratorSettings, MatcherConfiguration};
pub use diag::{Diagnostic, DiagnosticSink, Discard, Severity};
pub use emit::{DirectorySink, EmissionSink, GeneratedUnit};
pub use error::{ConfigError, EmitError, GenerationError};
pub use guard::GenerationMarker;

use diag::Traced;
use matcher::{GenerationContext, MatcherSpec};
use model::{DeclarationModel, TypeDescriptor};

use std::collections::{BTreeSet, HashSet};

/// Runs generation rounds against one declaration graph.
pub struct MatcherGenerator<'m> {
    model: &'m dyn DeclarationModel,
    settings: GeneratorSettings,
    clock: Box<dyn TimeSource>,
}

/// What a round did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// Whether the round had any configuration to act on.
    pub claimed: bool,
    /// Qualified names of the emitted matchers, in emission order.
    pub generated: Vec<String>,
}

impl<'m> MatcherGenerator<'m> {
    /// A generator reading the wall clock.
    pub fn new(
        model: &'m dyn DeclarationModel,
        settings: GeneratorSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(MatcherGenerator {
            model,
            settings,
            clock: Box::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Runs one round over `configurations`.
    ///
    /// A type listed by several configurations is generated once, attributed
    /// to the first configuration listing it.
    pub fn process(
        &self,
        configurations: &[MatcherConfiguration],
        diagnostics: &mut dyn DiagnosticSink,
        output: &mut dyn EmissionSink,
    ) -> Result<RoundReport, GenerationError> {
        let mut diagnostics = Traced(diagnostics);
        diagnostics.report(Diagnostic::note("Matcher generation started"));

        let mut report = RoundReport::default();
        if configurations.is_empty() {
            return Ok(report);
        }
        report.claimed = true;

        let timestamp = clock::format_timestamp(self.clock.now())?;
        let marker = GenerationMarker::new(&self.settings.generator_id, timestamp);
        let candidates = self.candidates(configurations);

        let mut handled = HashSet::new();
        for config in configurations {
            let roots: BTreeSet<TypeDescriptor> =
                resolve::resolve(config, self.model, &mut diagnostics)
                    .into_iter()
                    .filter(|ty| handled.insert(ty.qualified_name().to_string()))
                    .collect();
            let targets = guard::filter(
                roots,
                &self.settings.generator_id,
                self.model,
                &mut diagnostics,
            );
            self.report_nested_skips(&targets, &config.origin, &mut diagnostics);

            let ctx = GenerationContext {
                model: self.model,
                candidates: &candidates,
                origin: &config.origin,
            };
            for target in &targets {
                let spec = MatcherSpec::for_root(target, &ctx, &marker);
                let unit = spec.to_unit(&self.settings.indent);
                let name = unit.qualified_name();

                tracing::debug!(
                    matcher = %name,
                    properties = spec.properties.len(),
                    nested = spec.nested.len(),
                    "emitting matcher"
                );
                output.emit(unit)?;
                report.generated.push(name);
            }
        }

        Ok(report)
    }

    /// Notes the nested types of `targets` that get no nested matcher: the
    /// non-public ones and those this generator stamped earlier. Each target
    /// is handled once per round, so each note is too.
    fn report_nested_skips(
        &self,
        targets: &BTreeSet<TypeDescriptor>,
        origin: &str,
        diagnostics: &mut dyn DiagnosticSink,
    ) {
        let nested: BTreeSet<TypeDescriptor> =
            expand::expand(targets, origin, self.model, diagnostics)
                .into_iter()
                .filter(|ty| !targets.contains(ty))
                .collect();
        guard::filter(nested, &self.settings.generator_id, self.model, diagnostics);
    }

    /// Every type some configuration wants a matcher for, nested ones included.
    fn candidates(&self, configurations: &[MatcherConfiguration]) -> BTreeSet<TypeDescriptor> {
        configurations
            .iter()
            .flat_map(|config| {
                let roots = resolve::resolve(config, self.model, &mut Discard);
                expand::expand(&roots, &config.origin, self.model, &mut Discard)
            })
            .collect()
    }
}
