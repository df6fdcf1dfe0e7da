//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `ECOBOT_DATA_DIR` and `ECOBOT_LOG_LEVEL` env overrides.
//! The Gemini API key comes from `GEMINI_API_KEY` only.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::AppError;

/// How the assistant chooses its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    /// Always call the hosted model.
    Live,
    /// Never call the hosted model; answer from the keyword resolver.
    Offline,
    /// Live when an API key is configured, offline otherwise.
    Auto,
}

/// What the session façade does when the live backend fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Answer from the keyword resolver instead.
    Permissive,
    /// Hand the failure back to the caller.
    Strict,
}

/// Gemini provider configuration. Populated from `[assistant.gemini]`.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL up to and including the API version, e.g. `.../v1beta`.
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub mode: AssistantMode,
    pub fallback: FallbackPolicy,
    /// Simulated latency of the offline resolver.
    pub mock_delay: Duration,
    pub gemini: GeminiConfig,
}

/// Mock account backend configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Simulated round-trip latency for login and signup.
    pub latency: Duration,
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub enabled: bool,
    /// Socket address to bind the HTTP channel to.
    pub bind: String,
}

#[derive(Debug, Clone)]
pub struct CommsConfig {
    pub console: ConsoleConfig,
    pub http: HttpConfig,
}

/// Fully-resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    /// Directory holding the persisted user record (already expanded, no `~`).
    pub data_dir: PathBuf,
    pub log_level: String,
    pub assistant: AssistantConfig,
    pub auth: AuthConfig,
    pub comms: CommsConfig,
    /// API key from `GEMINI_API_KEY` — `None` when unset or blank.
    /// Never sourced from TOML.
    pub gemini_api_key: Option<String>,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    app: RawApp,
    #[serde(default)]
    assistant: RawAssistant,
    #[serde(default)]
    auth: RawAuth,
    #[serde(default)]
    comms: RawComms,
}

#[derive(Deserialize)]
struct RawApp {
    name: String,
    data_dir: String,
    log_level: String,
}

#[derive(Deserialize)]
struct RawAssistant {
    #[serde(default = "default_mode")]
    mode: AssistantMode,
    #[serde(default = "default_fallback")]
    fallback: FallbackPolicy,
    #[serde(default = "default_mock_delay_ms")]
    mock_delay_ms: u64,
    #[serde(default)]
    gemini: RawGemini,
}

impl Default for RawAssistant {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            fallback: default_fallback(),
            mock_delay_ms: default_mock_delay_ms(),
            gemini: RawGemini::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawGemini {
    #[serde(default = "default_gemini_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_gemini_model")]
    model: String,
    #[serde(default = "default_gemini_temperature")]
    temperature: f32,
    #[serde(default = "default_gemini_max_output_tokens")]
    max_output_tokens: u32,
    #[serde(default = "default_gemini_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawGemini {
    fn default() -> Self {
        Self {
            api_base_url: default_gemini_api_base_url(),
            model: default_gemini_model(),
            temperature: default_gemini_temperature(),
            max_output_tokens: default_gemini_max_output_tokens(),
            timeout_seconds: default_gemini_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawAuth {
    #[serde(default = "default_auth_latency_ms")]
    latency_ms: u64,
}

impl Default for RawAuth {
    fn default() -> Self {
        Self { latency_ms: default_auth_latency_ms() }
    }
}

#[derive(Deserialize, Default)]
struct RawComms {
    #[serde(default)]
    console: RawConsole,
    #[serde(default)]
    http: RawHttp,
}

#[derive(Deserialize)]
struct RawConsole {
    /// Defaults to `true`: the console is the primary channel.
    #[serde(default = "default_true")]
    enabled: bool,
}

impl Default for RawConsole {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Deserialize)]
struct RawHttp {
    /// Defaults to `false`: HTTP must be explicitly enabled.
    #[serde(default = "default_false")]
    enabled: bool,
    #[serde(default = "default_http_bind")]
    bind: String,
}

impl Default for RawHttp {
    fn default() -> Self {
        Self { enabled: false, bind: default_http_bind() }
    }
}

fn default_mode() -> AssistantMode { AssistantMode::Auto }
fn default_fallback() -> FallbackPolicy { FallbackPolicy::Permissive }
fn default_mock_delay_ms() -> u64 { 1000 }
fn default_gemini_api_base_url() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_gemini_model() -> String { "gemini-1.5-pro".to_string() }
fn default_gemini_temperature() -> f32 { 0.2 }
fn default_gemini_max_output_tokens() -> u32 { 500 }
fn default_gemini_timeout_seconds() -> u64 { 60 }
fn default_auth_latency_ms() -> u64 { 1000 }

fn default_http_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Load config from `config_path` (default [`DEFAULT_CONFIG_PATH`]), then
/// apply env-var overrides.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let data_dir_override = env::var("ECOBOT_DATA_DIR").ok();
    let log_level_override = env::var("ECOBOT_LOG_LEVEL").ok();
    let mut config = load_from(
        Path::new(config_path.unwrap_or(DEFAULT_CONFIG_PATH)),
        data_dir_override.as_deref(),
        log_level_override.as_deref(),
    )?;
    config.gemini_api_key = env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    Ok(config)
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars. The API key is
/// left unset; [`load`] fills it from the environment.
pub fn load_from(
    path: &Path,
    data_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let app = parsed.app;
    let data_dir = expand_home(data_dir_override.unwrap_or(&app.data_dir));
    let log_level = log_level_override.unwrap_or(&app.log_level).to_string();

    let gemini = parsed.assistant.gemini;
    Ok(Config {
        app_name: app.name,
        data_dir,
        log_level,
        assistant: AssistantConfig {
            mode: parsed.assistant.mode,
            fallback: parsed.assistant.fallback,
            mock_delay: Duration::from_millis(parsed.assistant.mock_delay_ms),
            gemini: GeminiConfig {
                api_base_url: gemini.api_base_url.trim_end_matches('/').to_string(),
                model: gemini.model,
                temperature: gemini.temperature,
                max_output_tokens: gemini.max_output_tokens,
                timeout_seconds: gemini.timeout_seconds,
            },
        },
        auth: AuthConfig {
            latency: Duration::from_millis(parsed.auth.latency_ms),
        },
        comms: CommsConfig {
            console: ConsoleConfig { enabled: parsed.comms.console.enabled },
            http: HttpConfig {
                enabled: parsed.comms.http.enabled,
                bind: parsed.comms.http.bind,
            },
        },
        gemini_api_key: None,
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

impl Config {
    /// Offline, zero-latency config rooted at `data_dir` — no API keys, no
    /// external calls. Used by unit and integration tests.
    pub fn test_default(data_dir: &Path) -> Self {
        Self {
            app_name: "test".into(),
            data_dir: data_dir.to_path_buf(),
            log_level: "info".into(),
            assistant: AssistantConfig {
                mode: AssistantMode::Offline,
                fallback: FallbackPolicy::Permissive,
                mock_delay: Duration::ZERO,
                gemini: GeminiConfig {
                    api_base_url: "http://127.0.0.1:9/v1beta".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    max_output_tokens: 64,
                    timeout_seconds: 1,
                },
            },
            auth: AuthConfig { latency: Duration::ZERO },
            comms: CommsConfig {
                console: ConsoleConfig { enabled: true },
                http: HttpConfig { enabled: false, bind: default_http_bind() },
            },
            gemini_api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[app]
name = "test-bot"
data_dir = "~/.ecobot"
log_level = "info"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_basic_config() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.app_name, "test-bot");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.gemini_api_key.is_none());
    }

    #[test]
    fn defaults_match_hosted_assistant() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.assistant.mode, AssistantMode::Auto);
        assert_eq!(cfg.assistant.fallback, FallbackPolicy::Permissive);
        assert_eq!(cfg.assistant.mock_delay, Duration::from_millis(1000));
        assert_eq!(cfg.assistant.gemini.model, "gemini-1.5-pro");
        assert_eq!(cfg.assistant.gemini.max_output_tokens, 500);
        assert_eq!(cfg.auth.latency, Duration::from_millis(1000));
        assert!(cfg.comms.console.enabled);
        assert!(!cfg.comms.http.enabled);
    }

    #[test]
    fn assistant_section_overrides() {
        let f = write_toml(&format!(
            "{MINIMAL_TOML}\n[assistant]\nmode = \"offline\"\nfallback = \"strict\"\nmock_delay_ms = 0\n\n[assistant.gemini]\napi_base_url = \"http://localhost:1234/v1beta/\"\nmodel = \"gemini-pro\"\n"
        ));
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.assistant.mode, AssistantMode::Offline);
        assert_eq!(cfg.assistant.fallback, FallbackPolicy::Strict);
        assert_eq!(cfg.assistant.mock_delay, Duration::ZERO);
        assert_eq!(cfg.assistant.gemini.api_base_url, "http://localhost:1234/v1beta");
        assert_eq!(cfg.assistant.gemini.model, "gemini-pro");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let f = write_toml(&format!("{MINIMAL_TOML}\n[assistant]\nmode = \"sometimes\"\n"));
        let err = load_from(f.path(), None, None).unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.ecobot");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with(".ecobot"));
    }

    #[test]
    fn absolute_path_unchanged() {
        let p = expand_home("/absolute/path");
        assert_eq!(p, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), None, None);
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn env_data_dir_override() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), Some("/tmp/test-override"), None).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/test-override"));
    }

    #[test]
    fn env_log_level_override() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, Some("debug")).unwrap();
        assert_eq!(cfg.log_level, "debug");
    }
}
