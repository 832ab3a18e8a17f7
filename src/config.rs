//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/areapick/areapick.toml`
//! 3. Local config: `<dir>/.areapick.toml` (current directory unless given)
//! 4. Environment variables: `AREAPICK_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{DefaultsConfig, DEFAULT_HIDDEN_ROOT};

pub const DEFAULT_API_URL: &str =
    "https://firstmover-fast-api.vercel.app/getAvgListingsLast14Days";

/// Raw defaults for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDefaults {
    pub neighborhoods: Option<Vec<String>>,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    pub bedrooms_token: Option<String>,
    pub bathroom_token: Option<String>,
    pub fee_token: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub catalog_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub hidden_root_name: Option<String>,
    pub defaults: RawDefaults,
}

/// Merge name lists: overlay names are appended, `!name` removes a name.
///
/// Order is preserved (base first) since it becomes the selection order.
///
/// # Examples
/// ```ignore
/// merge_names(&["a", "b"], &["c"])       // → ["a", "b", "c"]
/// merge_names(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
/// ```
pub fn merge_names(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(base.len() + overlay.len());
    for name in base {
        if !result.contains(name) {
            result.push(name.clone());
        }
    }
    for entry in overlay {
        if let Some(negated) = entry.strip_prefix('!') {
            result.retain(|n| n != negated);
        } else if !result.contains(entry) {
            result.push(entry.clone());
        }
    }
    result
}

impl DefaultsConfig {
    /// Overlay with union semantics for the name list.
    fn merge(&self, overlay: &RawDefaults) -> Self {
        Self {
            neighborhoods: overlay
                .neighborhoods
                .as_ref()
                .map(|o| merge_names(&self.neighborhoods, o))
                .unwrap_or_else(|| self.neighborhoods.clone()),
            ..self.apply_scalars(overlay)
        }
    }

    /// Overlay with REPLACE semantics for the name list.
    fn apply_global(&self, global: &RawDefaults) -> Self {
        Self {
            neighborhoods: global
                .neighborhoods
                .clone()
                .unwrap_or_else(|| self.neighborhoods.clone()),
            ..self.apply_scalars(global)
        }
    }

    fn apply_scalars(&self, overlay: &RawDefaults) -> Self {
        Self {
            neighborhoods: self.neighborhoods.clone(),
            min_price: overlay.min_price.unwrap_or(self.min_price),
            max_price: overlay.max_price.unwrap_or(self.max_price),
            bedrooms_token: overlay
                .bedrooms_token
                .clone()
                .unwrap_or_else(|| self.bedrooms_token.clone()),
            bathroom_token: overlay
                .bathroom_token
                .clone()
                .unwrap_or_else(|| self.bathroom_token.clone()),
            fee_token: overlay
                .fee_token
                .clone()
                .unwrap_or_else(|| self.fee_token.clone()),
        }
    }
}

/// Unified configuration for areapick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON catalog of areas (default: ./neighborhoods.json)
    pub catalog_path: PathBuf,
    /// Scoring service endpoint
    pub api_url: String,
    /// HTTP timeout in milliseconds
    pub timeout_ms: u64,
    /// Top-level node left out of the displayed tree
    pub hidden_root_name: String,
    /// Baseline the form resets to
    pub defaults: DefaultsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("neighborhoods.json"),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: 10_000,
            hidden_root_name: DEFAULT_HIDDEN_ROOT.to_string(),
            defaults: DefaultsConfig::default(),
        }
    }
}

/// Get the XDG config directory for areapick.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "areapick").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("areapick.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".areapick.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~` and `$VAR` in the catalog path.
    fn expand_paths(&mut self) {
        let raw = self.catalog_path.to_string_lossy().to_string();
        let expanded = shellexpand::full(&raw)
            .map(|s| s.into_owned())
            .unwrap_or(raw);
        self.catalog_path = PathBuf::from(expanded);
    }

    /// Scalars: overlay wins if Some. Names: union with negation.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            defaults: self.defaults.merge(&overlay.defaults),
            ..self.apply_scalars(overlay)
        }
    }

    /// Scalars: global wins if Some. Names: replaced if specified.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            defaults: self.defaults.apply_global(&global.defaults),
            ..self.apply_scalars(global)
        }
    }

    fn apply_scalars(&self, overlay: &RawSettings) -> Self {
        Self {
            catalog_path: overlay
                .catalog_path
                .clone()
                .unwrap_or_else(|| self.catalog_path.clone()),
            api_url: overlay
                .api_url
                .clone()
                .unwrap_or_else(|| self.api_url.clone()),
            timeout_ms: overlay.timeout_ms.unwrap_or(self.timeout_ms),
            hidden_root_name: overlay
                .hidden_root_name
                .clone()
                .unwrap_or_else(|| self.hidden_root_name.clone()),
            defaults: self.defaults.clone(),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory holding `.areapick.toml` (skipped when None)
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with `!name` negation
    /// - Any → Env vars: REPLACE
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply AREAPICK_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("AREAPICK")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("defaults.neighborhoods"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("catalog_path") {
            settings.catalog_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("api_url") {
            settings.api_url = val;
        }
        if let Ok(val) = config.get::<u64>("timeout_ms") {
            settings.timeout_ms = val;
        }
        if let Ok(val) = config.get_string("hidden_root_name") {
            settings.hidden_root_name = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("defaults.neighborhoods") {
            settings.defaults.neighborhoods = val;
        }
        if let Ok(val) = config.get::<u32>("defaults.min_price") {
            settings.defaults.min_price = val;
        }
        if let Ok(val) = config.get::<u32>("defaults.max_price") {
            settings.defaults.max_price = val;
        }
        if let Ok(val) = config.get_string("defaults.bedrooms_token") {
            settings.defaults.bedrooms_token = val;
        }
        if let Ok(val) = config.get_string("defaults.bathroom_token") {
            settings.defaults.bathroom_token = val;
        }
        if let Ok(val) = config.get_string("defaults.fee_token") {
            settings.defaults.fee_token = val;
        }

        Ok(settings)
    }

    /// Reject defaults the form could never reach.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.defaults
            .validate()
            .map_err(|e| ApplicationError::Config {
                message: format!("defaults: {e}"),
            })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# areapick configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/areapick/areapick.toml  (defines your baseline)
#   Local:  ./.areapick.toml                  (per-directory additions)
#   Env:    AREAPICK_* environment variables   (explicit overrides)
#
# Name list merge semantics:
#   Global config REPLACES the compiled default areas.
#   Local config UNIONS with global. Use "!name" to drop an inherited area:
#     neighborhoods = ["Soho", "!Kips Bay"]

# JSON catalog: [{"id": 2, "name": "Manhattan", "parent_id": 1}, ...]
# catalog_path = "neighborhoods.json"

# Scoring service endpoint and timeout
# api_url = "https://firstmover-fast-api.vercel.app/getAvgListingsLast14Days"
# timeout_ms = 10000

# Top-level node hidden from the tree
# hidden_root_name = "NYC and NJ"

[defaults]
# neighborhoods = ["Tribeca", "Kips Bay", "Gramercy Park"]
# min_price = 2500
# max_price = 5000
# bedrooms_token = "any"        # or buckets, e.g. "1,2" (4 means 4+)
# bathroom_token = "any"        # or a minimum, e.g. "1.5"
# fee_token = "fees_ok_if_10pct_cheaper"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_default_settings_when_validating_then_passes() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.hidden_root_name, "NYC and NJ");
        assert_eq!(settings.defaults.min_price, 2500);
    }

    #[test]
    fn given_tilde_in_catalog_path_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            catalog_path: PathBuf::from("~/areas/neighborhoods.json"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.catalog_path.to_string_lossy();
        assert!(path.starts_with(&home), "should start with home: {}", path);
        assert!(!path.contains('~'), "should not contain tilde: {}", path);
    }

    #[test]
    fn test_merge_names_union_keeps_order() {
        let result = merge_names(&names(&["a", "b"]), &names(&["c", "a"]));
        assert_eq!(result, names(&["a", "b", "c"]));
    }

    #[test]
    fn test_merge_names_negation() {
        let result = merge_names(&names(&["a", "b"]), &names(&["!a", "c"]));
        assert_eq!(result, names(&["b", "c"]));
    }

    #[test]
    fn test_merge_names_negation_nonexistent() {
        let result = merge_names(&names(&["a", "b"]), &names(&["!x"]));
        assert_eq!(result, names(&["a", "b"]));
    }

    #[test]
    fn test_merge_names_empty_overlay() {
        let result = merge_names(&names(&["a"]), &[]);
        assert_eq!(result, names(&["a"]));
    }

    #[test]
    fn test_apply_global_replaces_names() {
        let base = Settings::default();
        let global = RawSettings {
            api_url: Some("http://localhost:9000/score".into()),
            defaults: RawDefaults {
                neighborhoods: Some(names(&["Soho"])),
                min_price: Some(1000),
                ..RawDefaults::default()
            },
            ..RawSettings::default()
        };

        let result = base.apply_global(&global);

        assert_eq!(result.api_url, "http://localhost:9000/score");
        assert_eq!(result.defaults.neighborhoods, names(&["Soho"]));
        assert_eq!(result.defaults.min_price, 1000);
        assert_eq!(result.defaults.max_price, 5000);
        assert_eq!(result.catalog_path, base.catalog_path);
    }

    #[test]
    fn test_merge_with_unions_names() {
        let base = Settings::default();
        let local = RawSettings {
            defaults: RawDefaults {
                neighborhoods: Some(names(&["Soho", "!Kips Bay"])),
                fee_token: Some("no_fee".into()),
                ..RawDefaults::default()
            },
            ..RawSettings::default()
        };

        let result = base.merge_with(&local);

        assert_eq!(
            result.defaults.neighborhoods,
            names(&["Tribeca", "Gramercy Park", "Soho"])
        );
        assert_eq!(result.defaults.fee_token, "no_fee");
        assert_eq!(result.defaults.bedrooms_token, "any");
    }

    #[test]
    fn given_inverted_price_defaults_when_validating_then_fails() {
        let mut settings = Settings::default();
        settings.defaults.min_price = 6000;

        let err = settings.validate().unwrap_err();

        assert!(err.to_string().contains("price"), "{err}");
    }

    #[test]
    fn given_settings_when_serialized_then_toml_roundtrips() {
        let settings = Settings::default();
        let text = settings.to_toml().expect("serialize");
        let parsed: Settings = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, settings);
    }
}
