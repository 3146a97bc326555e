use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    names::QualifiedName,
    resolver::{ResolverOptions, SPECIAL_TEST_NAMES, TestRoot},
};

pub const CONFIG_FILE_NAME: &str = ".covfixrc.json";

/// A test namespace root and the production namespace it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRootConfig {
    pub prefix: String,
    pub replacement: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_test_roots")]
    pub test_roots: Vec<TestRootConfig>,
    #[serde(default = "default_fallback_namespace")]
    pub fallback_namespace: String,
    #[serde(default = "default_special_names")]
    pub special_names: Vec<String>,
    #[serde(default)]
    pub verify_covered_method: bool,
}

fn default_includes() -> Vec<String> {
    vec!["tests".to_string()]
}

fn default_test_roots() -> Vec<TestRootConfig> {
    [("Tests\\Feature", "App"), ("Tests\\Unit", "App")]
        .map(|(prefix, replacement)| TestRootConfig {
            prefix: prefix.to_string(),
            replacement: replacement.to_string(),
        })
        .to_vec()
}

fn default_fallback_namespace() -> String {
    "App".to_string()
}

fn default_special_names() -> Vec<String> {
    SPECIAL_TEST_NAMES.map(String::from).to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: Vec::new(),
            includes: default_includes(),
            test_roots: default_test_roots(),
            fallback_namespace: default_fallback_namespace(),
            special_names: default_special_names(),
            verify_covered_method: false,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob patterns in `ignores` or `includes` are
    /// invalid, or if a namespace setting is empty.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for root in &self.test_roots {
            if QualifiedName::parse(&root.prefix).is_empty() {
                bail!("Empty namespace prefix in 'testRoots'");
            }
        }

        if QualifiedName::parse(&self.fallback_namespace).is_empty() {
            bail!("'fallbackNamespace' must not be empty");
        }

        Ok(())
    }

    /// Resolver settings derived from this configuration.
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            test_roots: self
                .test_roots
                .iter()
                .map(|root| TestRoot::new(&root.prefix, &root.replacement))
                .collect(),
            fallback_namespace: QualifiedName::parse(&self.fallback_namespace),
            special_names: self.special_names.clone(),
            verify_covered_method: self.verify_covered_method,
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the config file, `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    /// True if config was loaded from a file, false if using defaults.
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
