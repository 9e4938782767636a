use std::time::Duration;

use scribe_relay::domain::AudioFormat;
use scribe_relay::presentation::config::{
    ConversionClientSettings, ConversionMode, Environment, ScratchSettings, ServerSettings, Settings,
    TranscoderSettings, TranscriptionSettings,
};

#[test]
fn given_defaults_when_built_then_match_documented_values() {
    let settings = Settings::default();

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.max_upload_bytes(), 100 * 1024 * 1024);
    assert_eq!(settings.transcoder.program, "ffmpeg");
    assert_eq!(settings.transcoder.timeout(), Some(Duration::from_secs(300)));
    assert_eq!(settings.client.conversion.mode, ConversionMode::Remote);
    assert_eq!(settings.client.conversion.min_response_bytes, 64);
    assert_eq!(
        settings.client.transcription.timeout(),
        Some(Duration::from_secs(120))
    );
    assert!(settings.client.transcription.api_key.is_empty());
}

#[test]
fn given_default_conversion_settings_when_policy_built_then_aac_goes_to_mp3() {
    let policy = Settings::default().client.conversion.policy();

    assert!(policy.requires_conversion(Some(AudioFormat::Aac)));
    assert_eq!(policy.target(), AudioFormat::Mp3);
}

#[test]
fn given_base_url_and_path_when_endpoint_built_then_joined_with_single_slash() {
    let settings = TranscriptionSettings {
        api_base_url: "https://api.groq.com/openai/v1/".to_string(),
        endpoint_path: "/audio/transcriptions".to_string(),
        ..Default::default()
    };

    assert_eq!(
        settings.endpoint(),
        "https://api.groq.com/openai/v1/audio/transcriptions"
    );
}

#[test]
fn given_empty_endpoint_path_when_endpoint_built_then_base_url_used_as_is() {
    let settings = TranscriptionSettings {
        api_base_url: "http://whisper.local/v1/audio/transcriptions".to_string(),
        endpoint_path: String::new(),
        ..Default::default()
    };

    assert_eq!(
        settings.endpoint(),
        "http://whisper.local/v1/audio/transcriptions"
    );
}

#[test]
fn given_blank_scratch_directory_when_resolved_then_uses_temp_dir() {
    let settings = ScratchSettings {
        directory: Some("  ".to_string()),
    };

    assert_eq!(settings.resolve_directory(), std::env::temp_dir());
}

#[test]
fn given_upload_limit_in_megabytes_when_converted_then_bytes() {
    let server = ServerSettings {
        max_upload_mb: 2,
        ..Default::default()
    };

    assert_eq!(server.max_upload_bytes(), 2 * 1024 * 1024);
}

#[test]
fn given_repository_settings_file_when_loaded_then_succeeds() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.transcoder.default_format, AudioFormat::Mp3);
    assert_eq!(
        settings.client.conversion.convert_formats,
        vec![AudioFormat::Aac]
    );
}

#[test]
fn given_environment_names_when_parsed_then_case_insensitive() {
    assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Prod);
    assert_eq!("development".parse::<Environment>().unwrap(), Environment::Local);
    assert!("staging".parse::<Environment>().is_err());
}

#[test]
fn given_conversion_mode_names_when_parsed_then_recognized() {
    assert_eq!("Local".parse::<ConversionMode>().unwrap(), ConversionMode::Local);
    assert_eq!("remote".parse::<ConversionMode>().unwrap(), ConversionMode::Remote);
    assert!("cloud".parse::<ConversionMode>().is_err());
}

#[test]
fn given_zero_timeouts_when_read_then_every_limit_is_disabled() {
    let transcoder = TranscoderSettings {
        timeout_secs: 0,
        ..Default::default()
    };
    let conversion = ConversionClientSettings {
        timeout_secs: 0,
        ..Default::default()
    };
    let transcription = TranscriptionSettings {
        timeout_secs: 0,
        ..Default::default()
    };

    assert_eq!(transcoder.timeout(), None);
    assert_eq!(conversion.timeout(), None);
    assert_eq!(transcription.timeout(), None);
}
