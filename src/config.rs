//! Configuration for memovox services.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SUPABASE_URL, SUPABASE_KEY, MEMOVOX_USER,
//!    MEMOVOX_PROCESS_URL, MEMOVOX_CONVERTER_URL)
//! 2. Config file (.memovox/config.yaml)
//! 3. Defaults (process URL derived from the Supabase project URL)
//!
//! Config file discovery:
//! - Searches current directory and parents for .memovox/config.yaml
//! - The API key is env-only and never read from the file

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub services: ServicesConfig,
    /// User whose memos this installation operates on
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicesConfig {
    /// Supabase project URL
    pub supabase_url: Option<String>,
    /// AI processing endpoint (defaults to the project's process function)
    pub process_url: Option<String>,
    /// Audio conversion service (conversion is skipped when unset)
    pub converter_url: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub supabase_url: String,
    /// Project API key (env-only)
    pub supabase_key: String,
    pub process_url: String,
    pub converter_url: Option<String>,
    pub user_id: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    find_config_file_from(&std::env::current_dir().ok()?)
}

/// The directory walk behind [`find_config_file`]: nearest match wins.
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".memovox").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Default process endpoint for a Supabase project
fn derive_process_url(supabase_url: &str) -> String {
    format!(
        "{}/functions/v1/process",
        supabase_url.trim_end_matches('/')
    )
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();
    let file = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    resolve_config(file, config_file, env_var)
}

/// Merge file values with the environment (environment wins).
fn resolve_config<F>(
    file: Option<ConfigFile>,
    config_file: Option<PathBuf>,
    env: F,
) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let services = file
        .as_ref()
        .map(|f| f.services.clone())
        .unwrap_or_default();

    let supabase_url = env("SUPABASE_URL")
        .or(services.supabase_url)
        .context("Supabase URL not configured. Set SUPABASE_URL or services.supabase_url in .memovox/config.yaml")?;

    // The key never lives in the config file
    let supabase_key = env("SUPABASE_KEY")
        .context("SUPABASE_KEY environment variable required")?;

    let user_id = env("MEMOVOX_USER")
        .or_else(|| file.as_ref().and_then(|f| f.user_id.clone()))
        .context("User not configured. Set MEMOVOX_USER or user_id in .memovox/config.yaml")?;

    let process_url = env("MEMOVOX_PROCESS_URL")
        .or(services.process_url)
        .unwrap_or_else(|| derive_process_url(&supabase_url));

    let converter_url = env("MEMOVOX_CONVERTER_URL").or(services.converter_url);

    Ok(ResolvedConfig {
        supabase_url,
        supabase_key,
        process_url,
        converter_url,
        user_id,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
