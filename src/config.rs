//! Layered application configuration.
//!
//! Priority: CLI flag > CLI env var > `OPENSCRIPT_`-prefixed env var >
//! config file > built-in defaults.

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::llm::{LlmSettings, Provider};

/// Default LLM endpoint (Friendli serverless inference).
const DEFAULT_LLM_BASE_URL: &str = "https://api.friendli.ai/serverless";
/// Default generation model.
const DEFAULT_LLM_MODEL: &str = "meta-llama-3.1-8b-instruct";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub resilience: ResilienceConfig,
    pub youtube: YoutubeConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub timeout_disabled: bool,
    pub request_timeout_secs: u64,
}

/// Defaults for YouTube popular-video lookups.
#[derive(Debug, Deserialize, Clone)]
pub struct YoutubeConfig {
    pub region_code: String,
    pub category_id: String,
    pub max_results: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// How many top search results the video-idea pipeline transcribes.
    pub transcribe_top_n: usize,
    /// How many trailing transcript messages API responses include.
    pub history_tail: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("resilience.request_timeout_secs", 120)?
            .set_default("youtube.region_code", "US")?
            .set_default("youtube.category_id", "0")?
            .set_default("youtube.max_results", 5)?
            .set_default("pipeline.transcribe_top_n", 3)?
            .set_default("pipeline.history_tail", 10)?;

        // Config file: explicit path wins, otherwise pick up ./config.yaml
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if std::path::Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config.yaml").required(false));
        }

        // Environment variables, e.g. OPENSCRIPT_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("OPENSCRIPT")
                .separator("__")
                .try_parsing(true),
        );

        // CLI overrides beat everything else
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

/// Load LLM connection settings from the environment.
///
/// `LLM_API_KEY` is optional here; endpoints that need the model report a
/// configuration error when it is absent.
pub fn load_llm_settings() -> LlmSettings {
    let base_url = std::env::var("LLM_BASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());

    let model = std::env::var("LLM_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());

    let api_key = std::env::var("LLM_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty());

    let provider = Provider::detect_from_url(&base_url);

    LlmSettings {
        base_url,
        api_key,
        model,
        provider,
    }
}
