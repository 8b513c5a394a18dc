//! Configuration management for the fenced code preprocessor.
//!
//! Parses `fenced.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Command-line style overrides can be applied during load via
//! [`OverrideSettings`].
//!
//! ```toml
//! [highlight]
//! enabled = true
//! linenums = true
//! css_class = "codehilite"
//!
//! [whitespace]
//! tab_length = 4
//! ```

use std::path::{Path, PathBuf};

use fenced_code::{
    CodeHilite, DEFAULT_CSS_CLASS, DEFAULT_STYLE, DEFAULT_TAB_LENGTH, FencedBlockPreprocessor,
    HighlightConfig, NormalizeWhitespace, Pipeline, PipelineError, Placement,
    register_fenced_code,
};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "fenced.toml";

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct OverrideSettings {
    /// Override the highlighting enabled flag.
    pub highlight_enabled: Option<bool>,
    /// Override the default line numbering.
    pub linenums: Option<bool>,
    /// Override the wrapper CSS class.
    pub css_class: Option<String>,
    /// Override the tab width.
    pub tab_length: Option<usize>,
}

/// Preprocessor configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Highlighting defaults.
    pub highlight: HighlightSection,
    /// Whitespace normalization.
    pub whitespace: WhitespaceConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[highlight]` section.
///
/// When disabled, blocks render as plain `<pre><code>` wrappers and the
/// remaining fields are ignored.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HighlightSection {
    /// Whether blocks go through the highlighter.
    pub enabled: bool,
    /// Default line numbering (absent = let the highlighter decide).
    pub linenums: Option<bool>,
    /// Default language guessing.
    pub guess_lang: bool,
    /// Default wrapper CSS class.
    pub css_class: String,
    /// Default style name.
    pub pygments_style: String,
    /// Default for inline styles instead of classes.
    pub noclasses: bool,
}

impl Default for HighlightSection {
    fn default() -> Self {
        Self {
            enabled: false,
            linenums: None,
            guess_lang: true,
            css_class: DEFAULT_CSS_CLASS.to_owned(),
            pygments_style: DEFAULT_STYLE.to_owned(),
            noclasses: false,
        }
    }
}

/// `[whitespace]` section.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WhitespaceConfig {
    /// Number of columns per tab stop.
    pub tab_length: usize,
}

impl Default for WhitespaceConfig {
    fn default() -> Self {
        Self {
            tab_length: DEFAULT_TAB_LENGTH,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Pipeline assembly error.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `fenced.toml` in current directory and parents,
    /// falling back to defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&OverrideSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(settings) = overrides {
            config.apply_overrides(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Search for a config file in `start` and its parents.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Apply override settings to the configuration.
    fn apply_overrides(&mut self, settings: &OverrideSettings) {
        if let Some(enabled) = settings.highlight_enabled {
            self.highlight.enabled = enabled;
        }
        if let Some(linenums) = settings.linenums {
            self.highlight.linenums = Some(linenums);
        }
        if let Some(css_class) = &settings.css_class {
            self.highlight.css_class.clone_from(css_class);
        }
        if let Some(tab_length) = settings.tab_length {
            self.whitespace.tab_length = tab_length;
        }
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.highlight.enabled {
            require_non_empty(&self.highlight.css_class, "highlight.css_class")?;
            require_non_empty(&self.highlight.pygments_style, "highlight.pygments_style")?;
        }
        if self.whitespace.tab_length == 0 {
            return Err(ConfigError::Validation(
                "whitespace.tab_length must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// Highlighting defaults, or `None` when highlighting is disabled.
    #[must_use]
    pub fn highlight_config(&self) -> Option<HighlightConfig> {
        let section = &self.highlight;
        section.enabled.then(|| HighlightConfig {
            linenums: section.linenums,
            guess_lang: section.guess_lang,
            css_class: section.css_class.clone(),
            pygments_style: section.pygments_style.clone(),
            noclasses: section.noclasses,
        })
    }

    /// Build the fenced code preprocessor described by this configuration.
    #[must_use]
    pub fn preprocessor(&self) -> FencedBlockPreprocessor {
        match self.highlight_config() {
            Some(config) => FencedBlockPreprocessor::new().with_highlighter(CodeHilite, config),
            None => FencedBlockPreprocessor::new(),
        }
    }

    /// Build a pipeline with whitespace normalization followed by the
    /// fenced code step.
    pub fn pipeline(&self) -> Result<Pipeline, ConfigError> {
        let mut pipeline = Pipeline::new();
        pipeline.register(
            NormalizeWhitespace::new(self.whitespace.tab_length),
            Placement::Start,
        )?;
        register_fenced_code(&mut pipeline, self.preprocessor())?;
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use fenced_code::HtmlStash;
    use pretty_assertions::assert_eq;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.highlight.enabled);
        assert_eq!(config.highlight.css_class, "codehilite");
        assert_eq!(config.highlight.pygments_style, "default");
        assert!(config.highlight.guess_lang);
        assert_eq!(config.whitespace.tab_length, 4);
        assert!(config.highlight_config().is_none());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_load_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[highlight]
enabled = true
linenums = false
guess_lang = false
css_class = "hl"
pygments_style = "monokai"
noclasses = true

[whitespace]
tab_length = 8
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.whitespace.tab_length, 8);
        assert_eq!(
            config.highlight_config(),
            Some(HighlightConfig {
                linenums: Some(false),
                guess_lang: false,
                css_class: "hl".to_owned(),
                pygments_style: "monokai".to_owned(),
                noclasses: true,
            })
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[highlight]\nenabled = true\n");

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.highlight_config(), Some(HighlightConfig::default()));
        assert_eq!(config.whitespace, WhitespaceConfig::default());
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load(Some(&missing), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[highlight]\nenabled = \"maybe\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[highlight]\nenabled = true\ncss_class = \"\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: highlight.css_class cannot be empty"
        );
    }

    #[test]
    fn test_zero_tab_length_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[whitespace]\ntab_length = 0\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_overrides_applied_after_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[highlight]\ncss_class = \"file\"\n");
        let overrides = OverrideSettings {
            highlight_enabled: Some(true),
            linenums: Some(true),
            css_class: Some("cli".to_owned()),
            tab_length: Some(2),
        };

        let config = Config::load(Some(&path), Some(&overrides)).unwrap();
        let highlight = config.highlight_config().unwrap();
        assert_eq!(highlight.css_class, "cli");
        assert_eq!(highlight.linenums, Some(true));
        assert_eq!(config.whitespace.tab_length, 2);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let overrides = OverrideSettings {
            tab_length: Some(0),
            ..OverrideSettings::default()
        };
        assert!(Config::load(Some(&path), Some(&overrides)).is_err());
    }

    #[test]
    fn test_discover_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let nested = dir.path().join("docs").join("guide");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_from(&nested), Some(path));
    }

    #[test]
    fn test_pipeline_plain() {
        let mut pipeline = Config::default().pipeline().unwrap();
        assert_eq!(
            pipeline.names(),
            vec!["normalize_whitespace", "fenced_code_block"]
        );

        let mut stash = HtmlStash::new();
        let lines = pipeline.run_text("```sh\n\tls\n```", &mut stash);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            stash.get(0).unwrap().html,
            "<pre><code class=\"sh\">    ls\n</code></pre>"
        );
    }

    #[test]
    fn test_pipeline_highlighted_with_tab_length() {
        let config = Config {
            highlight: HighlightSection {
                enabled: true,
                ..HighlightSection::default()
            },
            whitespace: WhitespaceConfig { tab_length: 2 },
            config_path: None,
        };
        let mut pipeline = config.pipeline().unwrap();

        let mut stash = HtmlStash::new();
        let _ = pipeline.run_text("```sh\n\tls\n```", &mut stash);
        assert_eq!(
            stash.get(0).unwrap().html,
            "<div class=\"codehilite\"><pre><code class=\"language-sh\">  ls\n</code></pre></div>"
        );
    }
}
