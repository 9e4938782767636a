mod audio_converter;
mod process_runner;
mod scratch_store;
mod transcription_engine;
mod transcription_observer;

pub use audio_converter::{AudioConverter, ConversionError, ConversionOutcome};
pub use process_runner::{ProcessError, ProcessOutput, ProcessRunner, ToolInvocation};
pub use scratch_store::{ScratchStore, ScratchStoreError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
pub use transcription_observer::TranscriptionObserver;
