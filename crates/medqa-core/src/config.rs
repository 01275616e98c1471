//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `medqa.toml`, `medqa.<env>.toml`
//! and `MEDQA_*` env vars (`__` separates nested keys, e.g.
//! `MEDQA_SEARCH__MIN_SCORE=0.2`).
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory scanned recursively for CSV exports.
    pub corpus_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { corpus_dir: "data".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Tokens with fewer characters are dropped.
    pub min_token_chars: usize,
    pub stop_words: Vec<String>,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self { min_token_chars: 2, stop_words: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Matches scoring below this are reported as not confident. `0.0` never gates.
    pub min_score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub text: TextSettings,
    pub search: SearchSettings,
}

impl Settings {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.text.min_token_chars == 0 {
            return Err(Error::InvalidConfig("text.min_token_chars must be at least 1".into()));
        }
        let s = self.search.min_score;
        if !(0.0..=1.0).contains(&s) {
            return Err(Error::InvalidConfig(format!("search.min_score must be within [0, 1], got {s}")));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
    /// Directory of the explicit config file; relative paths resolve against it.
    base_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("medqa.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("medqa.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("medqa.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("medqa.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("MEDQA_").split("__"));
        Ok(Self { figment, base_dir: None })
    }

    /// Defaults overlaid with a single TOML file, then env vars.
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            anyhow::bail!("config file {} does not exist", path.display());
        }
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("MEDQA_").split("__"));
        let base_dir = path.parent().map(Path::to_path_buf);
        Ok(Self { figment, base_dir })
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment, base_dir: None }
    }

    /// Expands `p`; when the config came from an explicit file, a relative
    /// result is taken relative to that file's directory.
    pub fn resolve_path<S: AsRef<str>>(&self, p: S) -> PathBuf {
        match &self.base_dir {
            Some(base) => resolve_with_base(base, p),
            None => expand_path(p),
        }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extracts and validates the typed settings.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(toml: &str) -> Config {
        Config::from_figment(Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml)))
    }

    #[test]
    fn defaults_apply_when_keys_are_missing() {
        let settings = config_from("").settings().expect("settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.text.min_token_chars, 2);
        assert_eq!(settings.search.min_score, 0.0);
    }

    #[test]
    fn toml_overrides_nested_keys() {
        let cfg = config_from("[search]\nmin_score = 0.25\n[text]\nstop_words = [\"what\", \"is\"]\n");
        let settings = cfg.settings().expect("settings");
        assert_eq!(settings.search.min_score, 0.25);
        assert_eq!(settings.text.stop_words, vec!["what".to_string(), "is".to_string()]);
        assert_eq!(settings.text.min_token_chars, 2);
        let dir: String = cfg.get("data.corpus_dir").expect("corpus dir");
        assert_eq!(dir, "data");
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        assert!(config_from("[search]\nmin_score = 1.5\n").settings().is_err());
        let mut s = Settings::default();
        s.text.min_token_chars = 0;
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/srv/medqa");
        assert_eq!(resolve_with_base(base, "data"), PathBuf::from("/srv/medqa/data"));
        assert_eq!(resolve_with_base(base, "/abs/data"), PathBuf::from("/abs/data"));
    }

    #[test]
    fn corpus_dir_is_relative_to_explicit_config_file() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("medqa.toml");
        std::fs::write(&path, "[data]\ncorpus_dir = \"medquad\"\n").expect("write config");
        let cfg = Config::load_file(&path).expect("config");
        let settings = cfg.settings().expect("settings");
        assert_eq!(cfg.resolve_path(&settings.data.corpus_dir), tmp.path().join("medquad"));
        assert_eq!(cfg.resolve_path("/abs/data"), PathBuf::from("/abs/data"));

        let unanchored = config_from("");
        assert_eq!(unanchored.resolve_path("data"), PathBuf::from("data"));
    }
}
