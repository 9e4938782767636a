mod conversion_service;
mod scratch_lease;
mod transcription_orchestrator;

pub use conversion_service::{ConversionService, TranscoderConfig};
pub use scratch_lease::ScratchLease;
pub use transcription_orchestrator::{TranscribeError, TranscriptionOrchestrator};
