mod audio_artifact;
mod audio_format;
mod conversion_policy;
mod converted_audio;
mod failure_kind;
mod scratch_path;
mod transcription_result;
mod transcription_state;
mod uploaded_artifact;

pub use audio_artifact::{AudioArtifact, AudioUpload, DEFAULT_MEDIA_TYPE};
pub use audio_format::AudioFormat;
pub use conversion_policy::ConversionPolicy;
pub use converted_audio::ConvertedAudio;
pub use failure_kind::{Failure, FailureKind};
pub use scratch_path::ScratchPath;
pub use transcription_result::TranscriptionResult;
pub use transcription_state::{InvalidTransition, TranscriptionEvent, TranscriptionState};
pub use uploaded_artifact::UploadedArtifact;
