//! Shared configuration loader for the LC-3 highlighting tools.
//!
//! `defaults/lc3.default.toml` is embedded into every binary so that the documented
//! defaults and runtime behavior stay in sync. Applications layer user files and
//! command-line overrides on top via [`Loader`] before deserializing into [`Lc3Config`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use lc3_syntax::lc3::{
    CasePolicy, Dialect, DialectOptions, FoldStrategy, LanguageRegistry, RuleTableError, Style,
    Theme,
};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/lc3.default.toml");

/// Top-level configuration consumed by the LC-3 tools.
#[derive(Debug, Clone, Deserialize)]
pub struct Lc3Config {
    pub highlight: HighlightConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    /// Language that owns the `.asm` extension.
    pub dialect: Dialect,
    pub directive_case: CasePolicy,
    /// Overrides every language's fold strategy when set.
    #[serde(default)]
    pub folding: Option<FoldStrategy>,
    pub theme: String,
    /// Token class -> style, merged over the chosen theme.
    #[serde(default)]
    pub theme_overrides: BTreeMap<String, Style>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown theme `{name}` (available: {available})")]
    UnknownTheme { name: String, available: String },
    #[error(transparent)]
    RuleTable(#[from] RuleTableError),
}

impl HighlightConfig {
    pub fn dialect_options(&self) -> DialectOptions {
        DialectOptions {
            directive_case: self.directive_case,
        }
    }

    /// The configured built-in theme with the overrides applied.
    pub fn resolve_theme(&self) -> Result<Theme, SettingsError> {
        let theme = Theme::builtin(&self.theme).ok_or_else(|| SettingsError::UnknownTheme {
            name: self.theme.clone(),
            available: Theme::builtin_names().join(", "),
        })?;
        Ok(theme.with_overrides(self.theme_overrides.clone()))
    }

    /// A registry holding both dialects built with these settings, where `.asm`
    /// resolves to the configured dialect.
    pub fn build_registry(&self) -> Result<LanguageRegistry, SettingsError> {
        let options = self.dialect_options();
        let theme = self.resolve_theme()?;
        let registry = LanguageRegistry::new();
        for dialect in Dialect::ALL {
            let mut descriptor = dialect.descriptor(&options)?.with_theme(theme.clone());
            if let Some(folding) = self.folding {
                descriptor = descriptor.with_folding(folding);
            }
            registry.register(descriptor);
        }
        registry.claim_extension("asm", self.dialect.id());
        debug!(
            "highlighting with {} ({:?} directives, {} theme)",
            self.dialect, self.directive_case, theme.name
        );
        Ok(registry)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<Lc3Config, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Lc3Config, ConfigError> {
    Loader::new().build()
}
