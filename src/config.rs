//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root; stock defaults are overridden by whatever keys it sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Portfolio"
//! base_path = "/"            # Deploying under a subpath? e.g. "/folio/"
//! environment = "production" # development | staging | production
//! default_mode = "designer"  # engineer | designer
//!
//! [profile]
//! name = "Your Name"
//! location = ""
//! email = ""
//! social = []                # [{ label = "GitHub", url = "https://..." }]
//!
//! [profile.engineer]
//! headline = "I build reliable systems."
//! intro = ""
//! skills = []
//!
//! [profile.designer]
//! headline = "I design calm, useful products."
//! intro = ""
//! skills = []
//!
//! [resume]
//! file = "resume.pdf"        # Relative to the content root
//!
//! [images]
//! placeholder_aspect = [16, 9]
//! hash_length = 8
//!
//! [colors.engineer]
//! background = "#0b1020"
//! ...
//!
//! [processing]
//! max_processes = 4          # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::mode::Mode;
use crate::types::Environment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Title, deployment path, environment, default persona.
    pub site: SiteSection,
    /// Copy for the hero, about and contact sections.
    pub profile: ProfileConfig,
    /// Resume PDF location.
    pub resume: ResumeConfig,
    /// Image bundling settings.
    pub images: ImagesConfig,
    /// Color schemes for the two personas.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        let base = &self.site.base_path;
        if !base.starts_with('/') || !base.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "site.base_path must start and end with '/', got {base:?}"
            )));
        }
        if self.images.placeholder_aspect[0] == 0 || self.images.placeholder_aspect[1] == 0 {
            return Err(ConfigError::Validation(
                "images.placeholder_aspect values must be non-zero".into(),
            ));
        }
        if !(4..=64).contains(&self.images.hash_length) {
            return Err(ConfigError::Validation(
                "images.hash_length must be 4-64".into(),
            ));
        }
        if self.resume.file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "resume.file must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Browser title and header brand.
    pub title: String,
    /// Path prefix for every generated link.
    pub base_path: String,
    /// Drafts are listed only in `development`.
    pub environment: Environment,
    /// Persona shown on first load.
    pub default_mode: Mode,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            base_path: "/".to_string(),
            environment: Environment::default(),
            default_mode: Mode::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    pub name: String,
    pub location: String,
    pub email: String,
    pub social: Vec<SocialLink>,
    pub engineer: PersonaConfig,
    pub designer: PersonaConfig,
}

impl ProfileConfig {
    pub fn persona(&self, mode: Mode) -> &PersonaConfig {
        match mode {
            Mode::Engineer => &self.engineer,
            Mode::Designer => &self.designer,
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Your Name".to_string(),
            location: String::new(),
            email: String::new(),
            social: Vec::new(),
            engineer: PersonaConfig {
                headline: "I build reliable systems.".to_string(),
                intro: String::new(),
                skills: Vec::new(),
            },
            designer: PersonaConfig {
                headline: "I design calm, useful products.".to_string(),
                intro: String::new(),
                skills: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

/// Copy for one persona.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersonaConfig {
    pub headline: String,
    pub intro: String,
    /// Skills shown in the about section.
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResumeConfig {
    /// PDF path relative to the content root.
    pub file: String,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            file: "resume.pdf".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Aspect ratio `[width, height]` of placeholders for missing images.
    pub placeholder_aspect: [u32; 2],
    /// Hex characters of the content hash appended to bundled filenames.
    pub hash_length: usize,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            placeholder_aspect: [16, 9],
            hash_length: 8,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel bundling workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Color schemes, one per persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub engineer: ColorScheme,
    pub designer: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            engineer: ColorScheme::default_engineer(),
            designer: ColorScheme::default_designer(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Taglines, metadata labels, captions.
    pub text_muted: String,
    /// Buttons, active filter pills, links.
    pub accent: String,
    pub border: String,
}

impl ColorScheme {
    pub fn default_engineer() -> Self {
        Self {
            background: "#0b1020".to_string(),
            text: "#e6e9f2".to_string(),
            text_muted: "#8b93a7".to_string(),
            accent: "#7c6cff".to_string(),
            border: "#232a40".to_string(),
        }
    }

    pub fn default_designer() -> Self {
        Self {
            background: "#fff8f1".to_string(),
            text: "#1d1a17".to_string(),
            text_muted: "#6f655c".to_string(),
            accent: "#f0562e".to_string(),
            border: "#1d1a17".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_designer()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
title = "Portfolio"

# Path prefix for every generated link. Must start and end with "/".
# Use e.g. "/portfolio/" when deploying under a subpath.
base_path = "/"

# development | staging | production
# Draft projects are only listed in development.
environment = "production"

# Persona shown on first load: engineer | designer
default_mode = "designer"

# ---------------------------------------------------------------------------
# Profile copy (hero, about, contact)
# ---------------------------------------------------------------------------
[profile]
name = "Your Name"
location = ""
email = ""

# Contact links, e.g.
# social = [{ label = "GitHub", url = "https://github.com/you" }]
social = []

[profile.engineer]
headline = "I build reliable systems."
intro = ""
skills = []

[profile.designer]
headline = "I design calm, useful products."
intro = ""
skills = []

# ---------------------------------------------------------------------------
# Resume
# ---------------------------------------------------------------------------
[resume]
# PDF path relative to the content root. A missing file renders an inline
# error state on /resume/ instead of failing the build.
file = "resume.pdf"

# ---------------------------------------------------------------------------
# Images
# ---------------------------------------------------------------------------
[images]
# Aspect ratio [width, height] of placeholder blocks for missing images.
placeholder_aspect = [16, 9]

# Hex characters of the content hash appended to bundled filenames (4-64).
hash_length = 8

# ---------------------------------------------------------------------------
# Colors - engineer persona
# ---------------------------------------------------------------------------
[colors.engineer]
background = "#0b1020"
text = "#e6e9f2"
text_muted = "#8b93a7"
accent = "#7c6cff"
border = "#232a40"

# ---------------------------------------------------------------------------
# Colors - designer persona
# ---------------------------------------------------------------------------
[colors.designer]
background = "#fff8f1"
text = "#1d1a17"
text_muted = "#6f655c"
accent = "#f0562e"
border = "#1d1a17"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-bundling workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties for both personas.
///
/// The active persona is selected by `data-mode` on the root element.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let block = |mode: Mode, scheme: &ColorScheme| {
        format!(
            r#":root[data-mode="{mode}"] {{
    --color-bg: {bg};
    --color-text: {text};
    --color-text-muted: {muted};
    --color-accent: {accent};
    --color-border: {border};
}}"#,
            bg = scheme.background,
            text = scheme.text,
            muted = scheme.text_muted,
            accent = scheme.accent,
            border = scheme.border,
        )
    };
    format!(
        "{}\n\n{}",
        block(Mode::Engineer, &colors.engineer),
        block(Mode::Designer, &colors.designer)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site.base_path, "/");
        assert_eq!(config.site.environment, Environment::Production);
        assert_eq!(config.site.default_mode, Mode::Designer);
        assert_eq!(config.resume.file, "resume.pdf");
        assert_eq!(config.images.placeholder_aspect, [16, 9]);
        assert_eq!(config.images.hash_length, 8);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[site]
environment = "development"

[colors.designer]
accent = "#00aa00"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.environment, Environment::Development);
        assert_eq!(config.colors.designer.accent, "#00aa00");
        // Defaults preserved
        assert_eq!(config.site.title, "Portfolio");
        assert_eq!(config.colors.designer.background, "#fff8f1");
    }

    #[test]
    fn parse_profile_with_social_links() {
        let toml = r#"
[profile]
name = "Ada"
social = [{ label = "GitHub", url = "https://github.com/ada" }]

[profile.engineer]
skills = ["Rust", "Postgres"]
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.profile.name, "Ada");
        assert_eq!(config.profile.social[0].label, "GitHub");
        assert_eq!(config.profile.persona(Mode::Engineer).skills.len(), 2);
        assert!(config.profile.persona(Mode::Designer).skills.is_empty());
    }

    #[test]
    fn generate_css_has_both_personas() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains(r#":root[data-mode="engineer"]"#));
        assert!(css.contains(r#":root[data-mode="designer"]"#));
        assert!(css.contains("--color-accent: #7c6cff"));
        assert!(css.contains("--color-accent: #f0562e"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Portfolio");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site]
title = "Ada Lovelace"
base_path = "/folio/"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Ada Lovelace");
        assert_eq!(config.site.base_path, "/folio/");
        assert_eq!(config.site.default_mode, Mode::Designer);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "not valid toml [[[").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[site]\ntitel = \"x\"\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_environment_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[site]\nenvironment = \"prod\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_base_path_needs_slashes() {
        let mut config = SiteConfig::default();
        config.site.base_path = "folio/".into();
        assert!(config.validate().is_err());
        config.site.base_path = "/folio".into();
        assert!(config.validate().is_err());
        config.site.base_path = "/folio/".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_placeholder_aspect_zero() {
        let mut config = SiteConfig::default();
        config.images.placeholder_aspect = [0, 9];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_hash_length_bounds() {
        let mut config = SiteConfig::default();
        config.images.hash_length = 3;
        assert!(config.validate().is_err());
        config.images.hash_length = 65;
        assert!(config.validate().is_err());
        config.images.hash_length = 64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[site]\nbase_path = \"sub\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[colors.designer]
background = "#fff"
text = "#000"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors.designer]
background = "#fafafa"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let designer = merged.get("colors").unwrap().get("designer").unwrap();
        assert_eq!(designer.get("background").unwrap().as_str(), Some("#fafafa"));
        assert_eq!(designer.get("text").unwrap().as_str(), Some("#000"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("skills = [\"a\", \"b\"]").unwrap();
        let overlay: toml::Value = toml::from_str("skills = [\"c\"]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("skills").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[images]\nhash_length = 1\n").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.site.default_mode, defaults.site.default_mode);
        assert_eq!(config.profile.engineer.headline, defaults.profile.engineer.headline);
        assert_eq!(config.colors.engineer.accent, defaults.colors.engineer.accent);
        assert_eq!(config.colors.designer.border, defaults.colors.designer.border);
        assert_eq!(config.images.hash_length, defaults.images.hash_length);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in ["site", "profile", "resume", "images", "colors", "processing"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}
