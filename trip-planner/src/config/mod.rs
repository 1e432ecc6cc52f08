use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::retry::RetryConfig;
use std::env;
use std::time::Duration;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4-turbo";
/// Not configurable: itineraries are always sampled at this temperature.
const SAMPLING_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
    pub models: ModelConfig,
    pub retry: RetryConfig,
    /// OTLP collector endpoint; span export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Secret<String>,
    /// Base URL of an OpenAI-compatible API (no trailing slash).
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Chat model used for itinerary generation (e.g., gpt-4-turbo)
    pub text_model: String,
    pub temperature: f32,
}

impl PlannerConfig {
    /// Load configuration from the process environment.
    ///
    /// Fails when `OPENAI_API_KEY` is absent so a misconfigured deployment
    /// never starts serving requests.
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<L>(common: core_config::Config, lookup: L) -> Result<Self, AppError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";
        let get = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        let api_key = get("OPENAI_API_KEY", None)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OPENAI_API_KEY is set but empty"
            )));
        }

        let base_url = get("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL))?
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = parse_value(
            "PLANNER_TIMEOUT_SECS",
            &get("PLANNER_TIMEOUT_SECS", Some(&DEFAULT_TIMEOUT_SECS.to_string()))?,
        )?;
        let max_retries: u32 = parse_value(
            "PLANNER_MAX_RETRIES",
            &get("PLANNER_MAX_RETRIES", Some("0"))?,
        )?;

        Ok(PlannerConfig {
            common,
            openai: OpenAiConfig {
                api_key: Secret::new(api_key),
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            models: ModelConfig {
                text_model: get("PLANNER_MODEL", Some(DEFAULT_MODEL))?,
                temperature: SAMPLING_TEMPERATURE,
            },
            retry: RetryConfig::with_max_retries(max_retries),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
        })
    }
}

fn get_env<L>(lookup: &L, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
