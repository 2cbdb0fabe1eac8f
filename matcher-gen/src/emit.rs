use crate::error::EmitError;
use crate::guard::GenerationMarker;
use crate::java::Ident;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One rendered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub package: String,
    pub type_name: Ident,
    pub source: String,
    /// Qualified names of the declarations the file was generated from. Hosts
    /// with incremental builds use them to invalidate the file.
    pub originating_elements: Vec<String>,
    pub marker: GenerationMarker,
}

impl GeneratedUnit {
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.type_name.to_string()
        } else {
            format!("{}.{}", self.package, self.type_name)
        }
    }

    /// `com/example/PersonMatcher.java`
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.package.split('.').filter(|s| !s.is_empty()).collect();
        path.push(format!("{}.java", self.type_name));
        path
    }
}

/// Receives the units of a round.
///
/// A sink rejects a second unit with a name it already received in the same
/// round, the same way a compiler's file manager refuses to recreate a file.
pub trait EmissionSink {
    fn emit(&mut self, unit: GeneratedUnit) -> Result<(), EmitError>;
}

impl EmissionSink for Vec<GeneratedUnit> {
    fn emit(&mut self, unit: GeneratedUnit) -> Result<(), EmitError> {
        let name = unit.qualified_name();
        if self.iter().any(|emitted| emitted.qualified_name() == name) {
            return Err(EmitError::AlreadyEmitted(name));
        }
        self.push(unit);
        Ok(())
    }
}

/// Writes units below a source root, one file per unit.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    written: HashSet<String>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectorySink {
            root: root.into(),
            written: HashSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl EmissionSink for DirectorySink {
    fn emit(&mut self, unit: GeneratedUnit) -> Result<(), EmitError> {
        let name = unit.qualified_name();
        if !self.written.insert(name.clone()) {
            return Err(EmitError::AlreadyEmitted(name));
        }

        let path = self.root.join(unit.relative_path());
        let io = |source| EmitError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io)?;
        }
        fs::write(&path, &unit.source).map_err(io)?;

        tracing::debug!(path = %path.display(), "wrote matcher");
        Ok(())
    }
}
