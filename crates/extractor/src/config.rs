use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Configuration for an extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Inline ignore entries (qualified names, `Ns.Class:member` keys or variable ids)
    pub ignore: Vec<String>,

    /// Newline-delimited ignore file, merged with `ignore`
    pub ignore_file: Option<PathBuf>,

    /// Rewrite `f(T).call(null, …)` into `f<T>(…)` in captured lines
    pub rewrite_generic_calls: bool,

    /// Rewrite a class's variable id into its declared name inside its bodies
    pub rewrite_self_references: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ignore: vec![],
            ignore_file: None,
            rewrite_generic_calls: true,
            rewrite_self_references: true,
        }
    }
}

impl ExtractorConfig {
    /// Keep the generator's text untouched
    pub fn raw() -> Self {
        Self {
            rewrite_generic_calls: false,
            rewrite_self_references: false,
            ..Default::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ExtractError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config; a relative `ignore_file` is resolved against the config's directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let (Some(file), Some(dir)) = (config.ignore_file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(entry) = self.ignore.iter().find(|entry| entry.trim().is_empty()) {
            return Err(ExtractError::invalid_config(format!(
                "ignore entries must not be blank (got {entry:?})"
            )));
        }

        if let Some(file) = &self.ignore_file {
            if file.as_os_str().is_empty() {
                return Err(ExtractError::invalid_config("ignore_file must not be empty"));
            }
        }

        Ok(())
    }

    /// Build the effective ignore list (inline entries + ignore file)
    pub fn ignore_list(&self) -> Result<IgnoreList> {
        let mut list: IgnoreList = self.ignore.iter().map(String::as_str).collect();

        if let Some(file) = &self.ignore_file {
            let content = std::fs::read_to_string(file)?;
            list.extend_from_str(&content);
            log::debug!("Loaded ignore file {}", file.display());
        }

        Ok(list)
    }
}

/// Names excluded from the structural model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    entries: HashSet<String>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse newline-delimited entries; blank lines are dropped
    pub fn parse(content: &str) -> Self {
        let mut list = Self::new();
        list.extend_from_str(content);
        list
    }

    pub fn extend_from_str(&mut self, content: &str) {
        for line in content.lines() {
            self.insert(line);
        }
    }

    pub fn insert(&mut self, entry: &str) {
        let entry = entry.trim();
        if !entry.is_empty() {
            self.entries.insert(entry.to_string());
        }
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.contains(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = Self::new();
        for entry in iter {
            list.insert(entry);
        }
        list
    }
}
