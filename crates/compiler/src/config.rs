//! CLI and verifier configuration (§4.7).
//!
//! Mirrors the teacher crate's `CompilerConfig`/`ExternalBuiltin` builder
//! pattern: plain `Default`-derived structs populated via `with_*` methods,
//! with environment variables seeding the same settings at a lower
//! precedence than explicit CLI flags.

use std::env;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

/// Whether diagnostic rendering may use ANSI color escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    Disabled,
    #[default]
    Auto,
    Enabled,
}

impl ColorMode {
    /// Resolves to a concrete on/off decision. `Auto` is enabled only when
    /// `stderr_is_tty` reports a terminal.
    pub fn resolve(self, stderr_is_tty: bool) -> bool {
        match self {
            ColorMode::Disabled => false,
            ColorMode::Enabled => true,
            ColorMode::Auto => stderr_is_tty,
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" => Ok(ColorMode::Disabled),
            "auto" => Ok(ColorMode::Auto),
            "enabled" => Ok(ColorMode::Enabled),
            other => Err(format!("invalid color mode '{other}' (expected disabled, auto, or enabled)")),
        }
    }
}

/// Whether diagnostic rendering may assume a Unicode-capable terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnicodeMode {
    Disabled,
    #[default]
    Auto,
    Enabled,
}

impl UnicodeMode {
    pub fn resolve(self, locale_is_utf8: bool) -> bool {
        match self {
            UnicodeMode::Disabled => false,
            UnicodeMode::Enabled => true,
            UnicodeMode::Auto => locale_is_utf8,
        }
    }
}

impl FromStr for UnicodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" => Ok(UnicodeMode::Disabled),
            "auto" => Ok(UnicodeMode::Auto),
            "enabled" => Ok(UnicodeMode::Enabled),
            other => Err(format!("invalid unicode mode '{other}' (expected disabled, auto, or enabled)")),
        }
    }
}

/// Global settings shared by every `forgec` subcommand.
///
/// Built up from environment variables first, then overridden field-by-field
/// by whatever the CLI actually parsed, matching the precedence described in
/// §4.7: explicit flags win over `FORGE_*` environment variables.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub debug: bool,
    pub color_mode: ColorMode,
    pub unicode_mode: UnicodeMode,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig { debug: false, color_mode: ColorMode::default(), unicode_mode: UnicodeMode::default() }
    }
}

impl CliConfig {
    pub fn new() -> Self {
        CliConfig::default()
    }

    /// Seeds a config from `FORGE_DEBUG`/`FORGE_COLOR_MODE`/`FORGE_UNICODE_MODE`.
    /// Malformed values are ignored, leaving the built-in default in place.
    pub fn from_env() -> Self {
        let mut config = CliConfig::new();
        if let Ok(value) = env::var("FORGE_DEBUG") {
            if let Ok(parsed) = value.parse::<bool>() {
                config.debug = parsed;
            }
        }
        if let Ok(value) = env::var("FORGE_COLOR_MODE") {
            if let Ok(parsed) = value.parse::<ColorMode>() {
                config.color_mode = parsed;
            }
        }
        if let Ok(value) = env::var("FORGE_UNICODE_MODE") {
            if let Ok(parsed) = value.parse::<UnicodeMode>() {
                config.unicode_mode = parsed;
            }
        }
        config
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    pub fn with_unicode_mode(mut self, unicode_mode: UnicodeMode) -> Self {
        self.unicode_mode = unicode_mode;
        self
    }
}

/// Settings that influence the semantic verifier's behavior.
///
/// Currently the verifier has one externally-tunable knob (the minimum
/// severity rendered); this is kept as its own builder, separate from
/// `CliConfig`, so an embedder that links this crate as a library can drive
/// verification without pulling in CLI parsing at all.
#[derive(Debug, Clone, Default)]
pub struct VerifierConfig {
    pub minimum_severity: Option<forge_core::Severity>,
}

impl VerifierConfig {
    pub fn new() -> Self {
        VerifierConfig::default()
    }

    pub fn with_minimum_severity(mut self, severity: forge_core::Severity) -> Self {
        self.minimum_severity = Some(severity);
        self
    }

    pub fn minimum_severity(&self) -> forge_core::Severity {
        self.minimum_severity.unwrap_or(forge_core::Severity::Note)
    }

    /// Loads the subset of this config that a project can override via a
    /// `forge.toml` file, in the style of the teacher's own TOML-backed
    /// `LintConfig` (`_teacher_src/lint.rs`, before removal). Only
    /// `minimum_severity` is file-configurable today; CLI flags and
    /// environment variables remain the source of truth for everything else.
    pub fn load_from_file(path: &Path) -> Result<VerifierConfig, ConfigFileError> {
        let text = std::fs::read_to_string(path).map_err(ConfigFileError::Io)?;
        let file: ProjectConfigFile = toml::from_str(&text).map_err(ConfigFileError::Parse)?;
        let mut config = VerifierConfig::new();
        if let Some(severity) = file.minimum_severity {
            config = config.with_minimum_severity(severity.into());
        }
        Ok(config)
    }
}

/// The top-level table of a `forge.toml` project config file.
#[derive(Debug, Clone, Default, Deserialize)]
struct ProjectConfigFile {
    #[serde(default)]
    minimum_severity: Option<SeverityName>,
}

/// Deserializable mirror of [`forge_core::Severity`]; `toml`/`serde` have no
/// access to that type's definition, so its variant names are duplicated
/// here, lowercase-renamed the way the teacher's own config enums are.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SeverityName {
    Debug,
    Note,
    Warning,
    Error,
    FatalError,
    InternalError,
}

impl From<SeverityName> for forge_core::Severity {
    fn from(name: SeverityName) -> Self {
        match name {
            SeverityName::Debug => forge_core::Severity::Debug,
            SeverityName::Note => forge_core::Severity::Note,
            SeverityName::Warning => forge_core::Severity::Warning,
            SeverityName::Error => forge_core::Severity::Error,
            SeverityName::FatalError => forge_core::Severity::FatalError,
            SeverityName::InternalError => forge_core::Severity::InternalError,
        }
    }
}

/// Errors reading or parsing a `forge.toml` project config file.
#[derive(Debug)]
pub enum ConfigFileError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigFileError::Io(e) => write!(f, "could not read config file: {e}"),
            ConfigFileError::Parse(e) => write!(f, "could not parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigFileError::Io(e) => Some(e),
            ConfigFileError::Parse(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mode_parses_all_three_values() {
        assert_eq!("disabled".parse::<ColorMode>().unwrap(), ColorMode::Disabled);
        assert_eq!("auto".parse::<ColorMode>().unwrap(), ColorMode::Auto);
        assert_eq!("enabled".parse::<ColorMode>().unwrap(), ColorMode::Enabled);
        assert!("garbage".parse::<ColorMode>().is_err());
    }

    #[test]
    fn auto_color_mode_follows_tty_detection() {
        assert!(ColorMode::Auto.resolve(true));
        assert!(!ColorMode::Auto.resolve(false));
        assert!(ColorMode::Enabled.resolve(false));
        assert!(!ColorMode::Disabled.resolve(true));
    }

    #[test]
    fn cli_config_builder_overrides_defaults() {
        let config = CliConfig::new().with_debug(true).with_color_mode(ColorMode::Enabled);
        assert!(config.debug);
        assert_eq!(config.color_mode, ColorMode::Enabled);
        assert_eq!(config.unicode_mode, UnicodeMode::Auto);
    }

    #[test]
    fn verifier_config_defaults_to_note_severity() {
        let config = VerifierConfig::new();
        assert_eq!(config.minimum_severity(), forge_core::Severity::Note);
    }

    #[test]
    fn verifier_config_builder_sets_minimum_severity() {
        let config = VerifierConfig::new().with_minimum_severity(forge_core::Severity::Warning);
        assert_eq!(config.minimum_severity(), forge_core::Severity::Warning);
    }

    #[test]
    fn verifier_config_loads_minimum_severity_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.toml");
        std::fs::write(&path, "minimum_severity = \"warning\"\n").unwrap();
        let config = VerifierConfig::load_from_file(&path).unwrap();
        assert_eq!(config.minimum_severity(), forge_core::Severity::Warning);
    }

    #[test]
    fn verifier_config_file_with_no_minimum_severity_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.toml");
        std::fs::write(&path, "").unwrap();
        let config = VerifierConfig::load_from_file(&path).unwrap();
        assert_eq!(config.minimum_severity(), forge_core::Severity::Note);
    }

    #[test]
    fn verifier_config_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.toml");
        std::fs::write(&path, "minimum_severity = [not valid").unwrap();
        assert!(VerifierConfig::load_from_file(&path).is_err());
    }
}
