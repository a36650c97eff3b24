use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::application::{DEFAULT_EMBED_BATCH_SIZE, DEFAULT_TOP_K};
use crate::domain::chunking::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::domain::{PromptTemplate, TextSplitter, DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";
pub const DEFAULT_PROMPTS_PATH: &str = "config/prompts.yaml";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
    /// Files that did not exist and were replaced by defaults. Loading runs
    /// before logging is set up, so reporting them is left to the caller.
    pub missing_files: Vec<PathBuf>,
}

impl AppConfig {
    /// Reads the YAML files named by `APP_CONFIG` / `APP_PROMPTS` (or the
    /// defaults under `config/`), then applies environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let prompts_path =
            std::env::var("APP_PROMPTS").unwrap_or_else(|_| DEFAULT_PROMPTS_PATH.into());

        let mut app = Self::from_files(&config_path, &prompts_path)?;
        app.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(app)
    }

    pub fn from_files(
        config_path: impl AsRef<Path>,
        prompts_path: impl AsRef<Path>,
    ) -> anyhow::Result<Self> {
        let mut missing_files = Vec::new();
        let config = read_yaml_or_default(config_path.as_ref(), &mut missing_files)?;
        let prompts = read_yaml_or_default(prompts_path.as_ref(), &mut missing_files)?;

        Ok(Self {
            config,
            prompts,
            missing_files,
        })
    }

    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(host) = lookup("SERVER_HOST") {
            self.config.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.config.server.port = port
                .parse()
                .with_context(|| format!("SERVER_PORT is not a valid port: {port}"))?;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.config.llm.model = model;
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            self.config.embedding.model = model;
        }
        Ok(())
    }

    pub fn text_splitter(&self) -> crate::domain::Result<TextSplitter> {
        TextSplitter::new(
            self.config.chunking.chunk_size,
            self.config.chunking.chunk_overlap,
        )
    }

    pub fn prompt_template(&self) -> crate::domain::Result<PromptTemplate> {
        PromptTemplate::new(&self.prompts.rag.system, &self.prompts.rag.user)
    }
}

fn read_yaml_or_default<T: DeserializeOwned + Default>(
    path: &Path,
    missing: &mut Vec<PathBuf>,
) -> anyhow::Result<T> {
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid configuration in {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            missing.push(path.to_path_buf());
            Ok(T::default())
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub rag: RagConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Empty or `*` allows any origin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "server=debug,pdf_chat=debug,tower_http=debug".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "mistral".to_string(),
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimension: 768,
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub top_k: usize,
    pub include_history: bool,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            include_history: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub rag: RagPromptConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagPromptConfig {
    pub system: String,
    pub user: String,
}

impl Default for RagPromptConfig {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            user: DEFAULT_USER_PROMPT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            "chunking:\n  chunk_size: 512\nllm:\n  model: llama3\nlogging:\n  format: json\n",
        )
        .unwrap();

        assert_eq!(config.chunking.chunk_size, 512);
        assert_eq!(config.chunking.chunk_overlap, DEFAULT_CHUNK_OVERLAP);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.timeout_seconds, 120);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.rag.top_k, 4);
        assert!(config.rag.include_history);
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let app = AppConfig::from_files(dir.path().join("none.yaml"), dir.path().join("no.yaml"))
            .unwrap();

        assert_eq!(app.config.server.port, 8080);
        assert_eq!(app.prompts.rag.user, DEFAULT_USER_PROMPT);
        assert_eq!(
            app.missing_files,
            vec![dir.path().join("none.yaml"), dir.path().join("no.yaml")]
        );
        assert!(app.prompt_template().is_ok());
        assert_eq!(app.text_splitter().unwrap(), TextSplitter::default());
    }

    #[test]
    fn test_present_files_are_not_reported_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let prompts_path = dir.path().join("prompts.yaml");
        std::fs::write(&config_path, "server:\n  port: 9100\n").unwrap();
        std::fs::write(&prompts_path, "rag:\n  system: Be brief.\n").unwrap();

        let app = AppConfig::from_files(&config_path, &prompts_path).unwrap();

        assert!(app.missing_files.is_empty());
        assert_eq!(app.config.server.port, 9100);
        assert_eq!(app.prompts.rag.system, "Be brief.");
        assert_eq!(app.prompts.rag.user, DEFAULT_USER_PROMPT);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server: [not, a, map").unwrap();

        assert!(AppConfig::from_files(&path, dir.path().join("prompts.yaml")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [("SERVER_PORT", "9000"), ("LLM_MODEL", "phi3")].into();
        let mut app = AppConfig::default();

        app.apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(app.config.server.port, 9000);
        assert_eq!(app.config.llm.model, "phi3");
        assert_eq!(app.config.embedding.model, "nomic-embed-text");

        let result = app.apply_overrides(|key| (key == "SERVER_PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_settings_surface_as_domain_errors() {
        let mut app = AppConfig::default();
        app.config.chunking.chunk_overlap = app.config.chunking.chunk_size;
        app.prompts.rag.user = "no placeholders".to_string();

        assert!(app.text_splitter().is_err());
        assert!(app.prompt_template().is_err());
    }
}
