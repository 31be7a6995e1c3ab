use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, time::Duration};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_NOTES_TABLE: &str = "notes";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Reject anything but GET/HEAD on the list endpoint.
    #[serde(default = "default_enforce_list_method")]
    pub enforce_list_method: bool,
    pub backend: Backend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backend {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_notes_table")]
    pub notes_table: String,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_enforce_list_method() -> bool {
    true
}

fn default_notes_table() -> String {
    DEFAULT_NOTES_TABLE.to_string()
}

const fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

pub fn parse_config(contents: &str) -> Result<Config, Box<dyn std::error::Error>> {
    serde_yaml::from_str(contents).map_err(Into::into)
}

/// Builds the config from variables resolved through `lookup`.
///
/// `SUPABASE_URL` and `SUPABASE_ANON_KEY` are required, everything else
/// falls back to its default.
pub fn load_from_vars<F>(lookup: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    let backend = Backend {
        url: lookup("SUPABASE_URL").ok_or("SUPABASE_URL environment variable is required")?,
        anon_key: lookup("SUPABASE_ANON_KEY")
            .ok_or("SUPABASE_ANON_KEY environment variable is required")?,
        notes_table: lookup("NOTES_TABLE").unwrap_or_else(default_notes_table),
        request_timeout: match lookup("BACKEND_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse::<u64>()
                    .map_err(|e| format!("Failed to parse BACKEND_TIMEOUT_SECS: {e}"))?,
            ),
            None => DEFAULT_REQUEST_TIMEOUT,
        },
    };

    let port = match lookup("PORT") {
        Some(port) => port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {e}"))?,
        None => DEFAULT_PORT,
    };

    let enforce_list_method = match lookup("ENFORCE_LIST_METHOD") {
        Some(flag) => flag
            .parse::<bool>()
            .map_err(|e| format!("Failed to parse ENFORCE_LIST_METHOD: {e}"))?,
        None => true,
    };

    Ok(Config {
        port,
        enforce_list_method,
        backend,
    })
}

fn load_from_file(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    load_config_from(Path::new("."), |key| env::var(key).ok())
}

/// Resolves the config relative to `dir`.
///
/// Order: `$NOTES_API_CONFIG`, `config.yaml`, backend environment variables,
/// then `config.example.yaml`. The environment wins over the example file as
/// soon as either `SUPABASE_URL` or `SUPABASE_ANON_KEY` is set.
pub fn load_config_from<F>(dir: &Path, lookup: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = lookup("NOTES_API_CONFIG").unwrap_or_else(|| "config.yaml".to_string());

    let explicit = dir.join(&config_path);
    if explicit.exists() {
        return load_from_file(&explicit);
    }

    let default = dir.join("config.yaml");
    if default.exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file(&default);
    }

    if lookup("SUPABASE_URL").is_some() || lookup("SUPABASE_ANON_KEY").is_some() {
        tracing::info!(
            "No config file found, loading configuration from environment variables"
        );
        return load_from_vars(lookup).map_err(|e| {
            format!(
                "Config file not found and environment variables are incomplete. \
                 Tried: '{config_path}', 'config.yaml' and environment variables. \
                 Error: {e}"
            )
            .into()
        });
    }

    let example = dir.join("config.example.yaml");
    if example.exists() {
        tracing::warn!(
            "Config file '{}', 'config.yaml' and backend environment variables not found, \
             falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return load_from_file(&example);
    }

    Err(format!(
        "Config file not found. Tried: '{config_path}', 'config.yaml', \
         environment variables and 'config.example.yaml'"
    )
    .into())
}
