use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{JavadepError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether refactoring advice is enabled
    pub enabled: bool,

    /// LLM provider (openai, ollama)
    pub provider: String,

    /// Model name (e.g., "gpt-4o", "llama3")
    pub model: String,

    /// API key (for external providers)
    pub api_key: Option<String>,

    /// Base URL (for Ollama or custom endpoints)
    pub base_url: Option<String>,

    /// Maximum tokens for LLM responses
    pub max_tokens: Option<u32>,

    /// Temperature for LLM responses (0.0 to 1.0)
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Source scanning configuration
    pub scan: ScanConfig,

    /// LLM integration settings
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Source directories to analyze
    pub source_dirs: Vec<PathBuf>,

    /// Package prefix that marks a type as project-internal (empty = detect by
    /// membership in the scanned set)
    pub package_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum file size to parse (in bytes)
    pub max_file_size: usize,

    /// Also pick up same-package usages via the capitalized-identifier heuristic
    pub class_references: bool,

    /// Compute the reverse (who-uses-me) index
    pub reverse_dependencies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                name: "Unnamed Project".to_string(),
                source_dirs: vec![PathBuf::from("src")],
                package_prefix: String::new(),
            },
            scan: ScanConfig {
                max_file_size: 1024 * 1024, // 1MB
                class_references: false,
                reverse_dependencies: true,
            },
            llm: LlmConfig {
                enabled: false,
                provider: "openai".to_string(),
                model: "gpt-4o".to_string(),
                api_key: None,
                base_url: None,
                max_tokens: Some(2000),
                temperature: Some(0.3),
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| JavadepError::Config(e.to_string()))?;
        config.apply_env_fallbacks();
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| JavadepError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "Javadep.toml",
                    "javadep.toml",
                    ".javadep.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                let mut config = Self::default();
                config.apply_env_fallbacks();
                Ok(config)
            }
        }
    }

    /// The environment is consulted only here, at load time; components receive
    /// the finished immutable value.
    fn apply_env_fallbacks(&mut self) {
        if self.llm.api_key.is_none() {
            if let Ok(key) = std::env::var("JAVADEP_API_KEY") {
                if !key.is_empty() {
                    self.llm.api_key = Some(key);
                }
            }
        }
    }
}
