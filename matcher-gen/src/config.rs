use crate::error::ConfigError;

use serde::{Deserialize, Serialize};

/// Identifier stamped into generated markers unless configured otherwise.
pub const DEFAULT_GENERATOR_ID: &str = "matcher_gen.MatcherGenerator";

/// Settings that stay fixed for the lifetime of a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Written into every marker and compared against existing markers.
    pub generator_id: String,
    /// One level of indentation in generated sources.
    pub indent: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            generator_id: DEFAULT_GENERATOR_ID.to_string(),
            indent: "  ".to_string(),
        }
    }
}

impl GeneratorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator_id.trim().is_empty() {
            return Err(ConfigError::EmptyGeneratorId);
        }
        if self.generator_id.chars().any(char::is_control) {
            return Err(ConfigError::InvalidGeneratorId(self.generator_id.clone()));
        }
        if self.indent.is_empty() || !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ConfigError::InvalidIndent(self.indent.clone()));
        }
        Ok(())
    }
}

/// One configuration marker found by the host: the declaration carrying it
/// and the type or package names it lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfiguration {
    /// Qualified name of the annotated declaration.
    pub origin: String,
    pub value: Vec<String>,
}

impl MatcherConfiguration {
    pub fn new<I, S>(origin: impl Into<String>, value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MatcherConfiguration {
            origin: origin.into(),
            value: value.into_iter().map(Into::into).collect(),
        }
    }

    /// The configured names with repeats removed, first occurrence kept.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.value.len());
        for name in &self.value {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_names_are_deduplicated_in_order() {
        let config = MatcherConfiguration::new(
            "com.example.Config",
            ["com.example.b", "com.example.a", "com.example.b"],
        );
        assert_eq!(config.names(), ["com.example.b", "com.example.a"]);
    }

    #[test]
    fn test_default_settings_are_valid() {
        let settings = GeneratorSettings::default();
        assert_eq!(settings.generator_id, DEFAULT_GENERATOR_ID);
        assert_eq!(settings.indent, "  ");
        assert!(settings.validate().is_ok());
    }

    #[rstest]
    #[case("", "  ", ConfigError::EmptyGeneratorId)]
    #[case("  ", "  ", ConfigError::EmptyGeneratorId)]
    #[case("a\nb", "  ", ConfigError::InvalidGeneratorId("a\nb".to_string()))]
    #[case("gen", "", ConfigError::InvalidIndent(String::new()))]
    #[case("gen", " x", ConfigError::InvalidIndent(" x".to_string()))]
    fn test_invalid_settings(
        #[case] generator_id: &str,
        #[case] indent: &str,
        #[case] expected: ConfigError,
    ) {
        let settings = GeneratorSettings {
            generator_id: generator_id.to_string(),
            indent: indent.to_string(),
        };
        assert_eq!(settings.validate(), Err(expected));
    }
}
