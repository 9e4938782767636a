use scribe_relay::domain::{
    Failure, FailureKind, TranscriptionEvent, TranscriptionResult, TranscriptionState,
};

fn network_failure() -> Failure {
    Failure::new(FailureKind::Network, "status 500: boom")
}

#[test]
fn given_selected_when_conversion_required_then_converting() {
    let state = TranscriptionState::Selected
        .apply(TranscriptionEvent::ConversionRequired)
        .unwrap();

    assert_eq!(state, TranscriptionState::Converting);
    assert!(!state.is_terminal());
}

#[test]
fn given_selected_when_conversion_not_required_then_uploading() {
    let state = TranscriptionState::Selected
        .apply(TranscriptionEvent::ConversionNotRequired)
        .unwrap();

    assert_eq!(state, TranscriptionState::Uploading);
}

#[test]
fn given_conversion_path_when_all_steps_succeed_then_reaches_transcript() {
    let state = TranscriptionState::Selected
        .apply(TranscriptionEvent::ConversionRequired)
        .and_then(|s| s.apply(TranscriptionEvent::Converted))
        .and_then(|s| s.apply(TranscriptionEvent::UploadStarted))
        .and_then(|s| s.apply(TranscriptionEvent::Transcribed(TranscriptionResult::new("hi"))))
        .unwrap();

    assert_eq!(
        state,
        TranscriptionState::TranscriptSucceeded(TranscriptionResult::new("hi"))
    );
    assert!(state.is_terminal());
    assert!(state.failure().is_none());
}

#[test]
fn given_converting_when_conversion_rejected_then_terminal_with_failure() {
    let failure = Failure::new(FailureKind::Subprocess, "exit code 1: invalid data");

    let state = TranscriptionState::Converting
        .apply(TranscriptionEvent::ConversionRejected(failure.clone()))
        .unwrap();

    assert!(state.is_terminal());
    assert_eq!(state.failure(), Some(&failure));
    assert_eq!(state.name(), "conversion_failed");
}

#[test]
fn given_uploading_when_upload_rejected_then_upload_failed() {
    let state = TranscriptionState::Uploading
        .apply(TranscriptionEvent::UploadRejected(network_failure()))
        .unwrap();

    assert_eq!(state, TranscriptionState::UploadFailed(network_failure()));
}

#[test]
fn given_conversion_failed_when_upload_started_then_rejected() {
    let state = TranscriptionState::ConversionFailed(network_failure());

    let err = state.apply(TranscriptionEvent::UploadStarted).unwrap_err();

    assert_eq!(err.state, "conversion_failed");
    assert_eq!(err.event, "upload_started");
}

#[test]
fn given_selected_when_transcribed_directly_then_rejected() {
    let err = TranscriptionState::Selected
        .apply(TranscriptionEvent::Transcribed(TranscriptionResult::new("x")))
        .unwrap_err();

    assert_eq!(err.state, "selected");
    assert!(err.to_string().contains("transcribed"));
}

#[test]
fn given_terminal_success_when_any_event_applied_then_rejected() {
    let state = TranscriptionState::TranscriptSucceeded(TranscriptionResult::new("done"));

    assert!(state.apply(TranscriptionEvent::ConversionRequired).is_err());
}
