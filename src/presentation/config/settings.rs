use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use crate::domain::{AudioFormat, ConversionPolicy};

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub scratch: ScratchSettings,
    pub transcoder: TranscoderSettings,
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.toml`, `appsettings.<Environment>.toml` and `APP__*` variables over
    /// the built-in defaults. Both files are optional.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("transcoder.global_args")
                    .with_list_parse_key("client.conversion.convert_formats")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_mb: 100,
        }
    }
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScratchSettings {
    /// Falls back to the platform temp dir when unset.
    pub directory: Option<String>,
}

impl ScratchSettings {
    pub fn resolve_directory(&self) -> PathBuf {
        self.directory
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscoderSettings {
    pub program: String,
    pub global_args: Vec<String>,
    /// `0` disables the limit.
    pub timeout_secs: u64,
    pub default_format: AudioFormat,
}

impl Default for TranscoderSettings {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            global_args: vec!["-hide_banner".to_string(), "-nostdin".to_string()],
            timeout_secs: 300,
            default_format: AudioFormat::Mp3,
        }
    }
}

impl TranscoderSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub conversion: ConversionClientSettings,
    pub transcription: TranscriptionSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    Local,
    Remote,
}

impl std::str::FromStr for ConversionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(format!(
                "Invalid conversion mode: {}. Expected: local or remote",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversionClientSettings {
    pub mode: ConversionMode,
    pub remote_url: String,
    pub convert_formats: Vec<AudioFormat>,
    pub target_format: AudioFormat,
    pub min_response_bytes: usize,
    pub timeout_secs: u64,
}

impl Default for ConversionClientSettings {
    fn default() -> Self {
        Self {
            mode: ConversionMode::Remote,
            remote_url: "http://localhost:8080".to_string(),
            convert_formats: vec![AudioFormat::Aac],
            target_format: AudioFormat::Mp3,
            min_response_bytes: 64,
            timeout_secs: 300,
        }
    }
}

impl ConversionClientSettings {
    pub fn policy(&self) -> ConversionPolicy {
        ConversionPolicy::new(self.convert_formats.clone(), self.target_format)
    }

    /// `0` disables the limit.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub api_base_url: String,
    pub endpoint_path: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.groq.com/openai/v1".to_string(),
            endpoint_path: "/audio/transcriptions".to_string(),
            api_key: String::new(),
            model: "whisper-large-v3".to_string(),
            timeout_secs: 120,
        }
    }
}

impl TranscriptionSettings {
    pub fn endpoint(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        let path = self.endpoint_path.trim();
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    }

    /// `0` disables the limit.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enable_json: bool,
}
