use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => f.write_str("note"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// The configuration a diagnostic is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// The declaration carrying the configuration.
    pub element: String,
    /// The configured name the diagnostic is about, if it concerns one entry.
    pub entry: Option<String>,
}

/// A message for the host's diagnostic channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Qualified name of the type the message is about.
    pub element: Option<String>,
    pub origin: Option<Origin>,
}

impl Diagnostic {
    pub fn note(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Note,
            message: message.into(),
            element: None,
            origin: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::note(message)
        }
    }

    pub fn on(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn from_origin(mut self, element: impl Into<String>, entry: Option<String>) -> Self {
        self.origin = Some(Origin {
            element: element.into(),
            entry,
        });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(origin) = &self.origin {
            write!(f, " (configured on {})", origin.element)?;
        }
        Ok(())
    }
}

/// Receives the diagnostics of a round.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl DiagnosticSink for Discard {
    fn report(&mut self, _: Diagnostic) {}
}

/// Mirrors every diagnostic to `tracing` before handing it on.
pub(crate) struct Traced<'a>(pub(crate) &'a mut dyn DiagnosticSink);

impl DiagnosticSink for Traced<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let element = diagnostic.element.as_deref().unwrap_or_default();
        match diagnostic.severity {
            Severity::Note => tracing::info!(element, "{}", diagnostic.message),
            Severity::Warning => tracing::warn!(element, "{}", diagnostic.message),
        }
        self.0.report(diagnostic);
    }
}
