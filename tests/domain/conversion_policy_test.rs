use bytes::Bytes;
use scribe_relay::domain::{AudioFormat, ConversionPolicy, ConvertedAudio};

#[test]
fn given_default_policy_when_aac_checked_then_conversion_required() {
    let policy = ConversionPolicy::default();

    assert!(policy.requires_conversion(Some(AudioFormat::Aac)));
    assert_eq!(policy.target(), AudioFormat::Mp3);
}

#[test]
fn given_default_policy_when_supported_format_checked_then_no_conversion() {
    let policy = ConversionPolicy::default();

    assert!(!policy.requires_conversion(Some(AudioFormat::Mp3)));
    assert!(!policy.requires_conversion(Some(AudioFormat::Wav)));
}

#[test]
fn given_unknown_format_when_checked_then_uploaded_as_is() {
    let policy = ConversionPolicy::default();

    assert!(!policy.requires_conversion(None));
}

#[test]
fn given_custom_policy_when_checked_then_uses_configured_formats() {
    let policy = ConversionPolicy::new(vec![AudioFormat::Webm, AudioFormat::Ogg], AudioFormat::Wav);

    assert!(policy.requires_conversion(Some(AudioFormat::Webm)));
    assert!(!policy.requires_conversion(Some(AudioFormat::Aac)));
    assert_eq!(policy.mandatory(), &[AudioFormat::Webm, AudioFormat::Ogg]);
}

#[test]
fn given_converted_audio_when_download_name_requested_then_uses_target_extension() {
    let converted = ConvertedAudio::new(Bytes::from_static(b"ID3"), AudioFormat::Mp3);

    assert_eq!(converted.download_name(), "converted.mp3");
    assert_eq!(converted.media_type(), "audio/mpeg");
}
