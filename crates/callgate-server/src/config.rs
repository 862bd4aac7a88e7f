//! Server configuration loading from file and environment variables.

use callgate_telephony::TwilioConfig;
use callgate_types::session::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_VOICE};
use callgate_types::{FirstSpeaker, SessionConfig};
use callgate_voice::{VoiceConfig, DEFAULT_API_URL};
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;
use url::Url;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Voice provider credentials and session settings.
    #[serde(default)]
    pub voice: VoiceSettings,

    /// Telephony provider account.
    #[serde(default)]
    pub telephony: TwilioConfig,

    /// Contact roster source.
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Publicly reachable base URL of this gateway, used to build the
    /// callback URL for outbound calls. Defaults to the bind address.
    #[serde(default)]
    pub public_url: Option<String>,
}

/// Voice provider settings.
#[derive(Clone, Deserialize)]
pub struct VoiceSettings {
    #[serde(default = "default_voice_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// `agent` to have the voice agent speak first, `user` to wait.
    #[serde(default)]
    pub first_speaker: FirstSpeaker,
}

/// Contact roster configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Path to the `.xlsx` roster.
    #[serde(default = "default_directory_path")]
    pub path: String,

    /// Position of the roster sheet in the workbook (0 is the first sheet).
    #[serde(default)]
    pub sheet_index: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "callgate_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_voice_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_directory_path() -> String {
    "drivers.xlsx".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            api_url: default_voice_api_url(),
            api_key: String::new(),
            model: default_model(),
            voice: default_voice(),
            temperature: default_temperature(),
            first_speaker: FirstSpeaker::default(),
        }
    }
}

impl fmt::Debug for VoiceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceSettings")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("temperature", &self.temperature)
            .field("first_speaker", &self.first_speaker)
            .finish()
    }
}

impl VoiceSettings {
    /// Connection settings for the voice client.
    pub fn provider(&self) -> VoiceConfig {
        VoiceConfig::new(&self.api_url, &self.api_key)
    }

    /// Session template carrying these settings and `system_prompt`.
    pub fn session_template(&self, system_prompt: &str) -> SessionConfig {
        SessionConfig {
            model: self.model.clone(),
            voice: self.voice.clone(),
            temperature: self.temperature,
            first_speaker: self.first_speaker,
            ..SessionConfig::new(system_prompt)
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: default_directory_path(),
            sheet_index: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Base URL that outbound-call callbacks are built on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPublicUrl` if `server.public_url` is set
    /// but is not an absolute URL.
    pub fn callback_base(&self) -> Result<Url, ConfigError> {
        let raw = match self.server.public_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("http://{}:{}", self.server.host, self.server.port),
        };
        Url::parse(&raw).map_err(|e| ConfigError::InvalidPublicUrl(raw, e))
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The public base URL is not a valid absolute URL.
    #[error("invalid public url {0:?}: {1}")]
    InvalidPublicUrl(String, url::ParseError),
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies environment overrides (see [`apply_env_overrides`]).
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies environment variable overrides through `lookup`.
///
/// - `ULTRAVOX_API_KEY` overrides `voice.api_key`
/// - `ULTRAVOX_API_URL` overrides `voice.api_url`
/// - `TWILIO_ACCOUNT_SID` overrides `telephony.account_sid`
/// - `TWILIO_AUTH_TOKEN` overrides `telephony.auth_token`
/// - `TWILIO_PHONE_NUMBER` overrides `telephony.phone_number`
/// - `BASE_URL` overrides `server.public_url`
/// - `PORT` overrides `server.port`
/// - `CALLGATE_HOST` overrides `server.host`
/// - `CALLGATE_DIRECTORY_PATH` overrides `directory.path`
/// - `CALLGATE_DIRECTORY_SHEET` overrides `directory.sheet_index`
/// - `CALLGATE_LOG_LEVEL` overrides `logging.level`
/// - `CALLGATE_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// Unparsable numeric or address values are ignored.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup("ULTRAVOX_API_KEY") {
        config.voice.api_key = key;
    }
    if let Some(url) = lookup("ULTRAVOX_API_URL") {
        config.voice.api_url = url;
    }
    if let Some(sid) = lookup("TWILIO_ACCOUNT_SID") {
        config.telephony.account_sid = sid;
    }
    if let Some(token) = lookup("TWILIO_AUTH_TOKEN") {
        config.telephony.auth_token = token;
    }
    if let Some(number) = lookup("TWILIO_PHONE_NUMBER") {
        config.telephony.phone_number = number;
    }
    if let Some(url) = lookup("BASE_URL") {
        config.server.public_url = Some(url);
    }
    if let Some(port) = lookup("PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(host) = lookup("CALLGATE_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(path) = lookup("CALLGATE_DIRECTORY_PATH") {
        config.directory.path = path;
    }
    if let Some(sheet) = lookup("CALLGATE_DIRECTORY_SHEET") {
        if let Ok(parsed) = sheet.parse() {
            config.directory.sheet_index = parsed;
        }
    }
    if let Some(level) = lookup("CALLGATE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("CALLGATE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callgate_types::Medium;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn toml_sections_parse_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080
            public_url = "https://gateway.example"

            [voice]
            voice = "Jessica"
            first_speaker = "user"

            [telephony]
            account_sid = "AC123"
            phone_number = "+15550001111"

            [directory]
            path = "roster.xlsx"
            sheet_index = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.voice.voice, "Jessica");
        assert_eq!(config.voice.model, "fixie-ai/ultravox");
        assert_eq!(config.voice.first_speaker, FirstSpeaker::User);
        assert_eq!(config.telephony.api_base, "https://api.twilio.com");
        assert_eq!(config.directory.sheet_index, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("ULTRAVOX_API_KEY", "uv-key"),
                ("TWILIO_ACCOUNT_SID", "AC999"),
                ("TWILIO_AUTH_TOKEN", "tw-token"),
                ("TWILIO_PHONE_NUMBER", "+15550002222"),
                ("BASE_URL", "https://abc.ngrok.example"),
                ("PORT", "5050"),
                ("CALLGATE_LOG_JSON", "1"),
            ]),
        );

        assert_eq!(config.voice.api_key, "uv-key");
        assert_eq!(config.telephony.account_sid, "AC999");
        assert_eq!(config.telephony.auth_token, "tw-token");
        assert_eq!(config.telephony.phone_number, "+15550002222");
        assert_eq!(config.server.port, 5050);
        assert!(config.logging.json);
        assert_eq!(
            config.callback_base().unwrap().as_str(),
            "https://abc.ngrok.example/"
        );
    }

    #[test]
    fn unparsable_port_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, env(&[("PORT", "not-a-port")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn callback_base_defaults_to_bind_address() {
        let config = Config::default();
        assert_eq!(
            config.callback_base().unwrap().as_str(),
            "http://127.0.0.1:3000/"
        );
    }

    #[test]
    fn relative_public_url_is_rejected() {
        let mut config = Config::default();
        config.server.public_url = Some("gateway.example".to_string());
        assert!(matches!(
            config.callback_base(),
            Err(ConfigError::InvalidPublicUrl(..))
        ));
    }

    #[test]
    fn session_template_carries_voice_settings() {
        let settings = VoiceSettings {
            voice: "Jessica".to_string(),
            temperature: 0.5,
            ..VoiceSettings::default()
        };
        let template = settings.session_template("script");

        assert_eq!(template.system_prompt, "script");
        assert_eq!(template.voice, "Jessica");
        assert_eq!(template.temperature, 0.5);
        assert_eq!(template.medium, Medium::Twilio {});
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = Config::default();
        config.voice.api_key = "uv-secret".to_string();
        config.telephony.auth_token = "tw-secret".to_string();
        let printed = format!("{:?}", config);

        assert!(!printed.contains("uv-secret"));
        assert!(!printed.contains("tw-secret"));
    }
}
