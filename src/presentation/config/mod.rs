mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    ClientSettings, ConversionClientSettings, ConversionMode, LoggingSettings, ScratchSettings,
    ServerSettings, Settings, TranscoderSettings, TranscriptionSettings,
};
