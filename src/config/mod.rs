// Configuration module
// Centralized management of application configuration

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub mod tts; // TTS request settings

/// Default cap for user uploads: 15 MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_key: String,
    pub elevenlabs_api_key: String,
    pub elevenlabs_base_url: String,
    /// Explicit ffmpeg binary; `PATH` lookup when unset
    pub ffmpeg_path: Option<PathBuf>,
    /// Directory holding per-session temp files
    pub work_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Upper bound on concurrently running ffmpeg processes; unbounded when unset
    pub max_concurrent_mixes: Option<usize>,
    /// Timeout applied to every outbound HTTP call; none when unset
    pub upstream_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            supabase_url: "http://localhost:54321".to_string(),
            supabase_key: String::new(),
            elevenlabs_api_key: String::new(),
            elevenlabs_base_url: "https://api.elevenlabs.io".to_string(),
            ffmpeg_path: None,
            work_dir: std::env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_concurrent_mixes: None,
            upstream_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Загрузка конфигурации из переменных окружения
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, fallback: String| lookup(key).unwrap_or(fallback);

        Ok(Self {
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            supabase_url: text("SUPABASE_URL", defaults.supabase_url),
            supabase_key: text("SUPABASE_KEY", defaults.supabase_key),
            elevenlabs_api_key: text("ELEVENLABS_API_KEY", defaults.elevenlabs_api_key),
            elevenlabs_base_url: text("ELEVENLABS_BASE_URL", defaults.elevenlabs_base_url),
            ffmpeg_path: lookup("FFMPEG_PATH").map(PathBuf::from),
            work_dir: lookup("MIX_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
            max_concurrent_mixes: parse_var(&lookup, "MAX_CONCURRENT_MIXES")?,
            upstream_timeout_secs: parse_var(&lookup, "UPSTREAM_TIMEOUT_SECS")?,
        })
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.elevenlabs_base_url, "https://api.elevenlabs.io");
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.ffmpeg_path.is_none());
        assert!(config.max_concurrent_mixes.is_none());
        assert!(config.upstream_timeout().is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_KEY", "secret"),
            ("FFMPEG_PATH", "/opt/ffmpeg/bin/ffmpeg"),
            ("MIX_WORK_DIR", "/var/tmp/mix"),
            ("MAX_CONCURRENT_MIXES", "4"),
            ("UPSTREAM_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.supabase_url, "https://project.supabase.co");
        assert_eq!(config.supabase_key, "secret");
        assert_eq!(
            config.ffmpeg_path,
            Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
        );
        assert_eq!(config.work_dir, PathBuf::from("/var/tmp/mix"));
        assert_eq!(config.max_concurrent_mixes, Some(4));
        assert_eq!(config.upstream_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn malformed_number_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn blank_optional_number_counts_as_unset() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("MAX_CONCURRENT_MIXES", "  ")])).unwrap();
        assert!(config.max_concurrent_mixes.is_none());
    }
}
