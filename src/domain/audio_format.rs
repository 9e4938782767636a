use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Audio container formats the transcoder is asked to read or produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Aac,
    M4a,
    Ogg,
    Flac,
    Webm,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 7] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Aac,
        AudioFormat::M4a,
        AudioFormat::Ogg,
        AudioFormat::Flac,
        AudioFormat::Webm,
    ];

    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "mp3" | "mpga" | "mpeg" => Some(Self::Mp3),
            "wav" | "wave" => Some(Self::Wav),
            "aac" => Some(Self::Aac),
            "m4a" | "mp4" => Some(Self::M4a),
            "ogg" | "oga" | "opus" => Some(Self::Ogg),
            "flac" => Some(Self::Flac),
            "webm" => Some(Self::Webm),
            _ => None,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "audio/mpeg" | "audio/mp3" | "audio/mpga" => Some(Self::Mp3),
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some(Self::Wav),
            "audio/aac" | "audio/x-aac" | "audio/aacp" => Some(Self::Aac),
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => Some(Self::M4a),
            "audio/ogg" | "audio/opus" => Some(Self::Ogg),
            "audio/flac" | "audio/x-flac" => Some(Self::Flac),
            "audio/webm" => Some(Self::Webm),
            _ => None,
        }
    }

    /// Resolves the format of a named file, trusting the extension over the declared mime type.
    pub fn detect(filename: &str, content_type: Option<&str>) -> Option<Self> {
        filename
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
            .or_else(|| content_type.and_then(Self::from_mime))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Aac => "aac",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Webm => "webm",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Aac => "audio/aac",
            Self::M4a => "audio/mp4",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::Webm => "audio/webm",
        }
    }

    /// Encoder flags placed between the input and output paths.
    pub fn encoder_args(&self) -> &'static [&'static str] {
        match self {
            Self::Mp3 => &["-b:a", "192k"],
            Self::Wav => &["-c:a", "pcm_s16le"],
            Self::Aac | Self::M4a => &["-c:a", "aac", "-b:a", "192k"],
            Self::Ogg => &["-c:a", "libvorbis"],
            Self::Flac => &["-c:a", "flac"],
            Self::Webm => &["-c:a", "libopus"],
        }
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| {
            format!(
                "Unsupported audio format: {}. Expected one of: {}",
                s,
                Self::ALL
                    .iter()
                    .map(AudioFormat::extension)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
