use scribe_relay::application::ports::TranscriptionObserver;
use scribe_relay::domain::{Failure, FailureKind, TranscriptionState};
use scribe_relay::presentation::ConsoleObserver;

#[test]
fn given_new_observer_when_created_then_not_busy() {
    assert!(!ConsoleObserver::new().is_busy());
}

#[test]
fn given_busy_toggled_when_queried_then_reflects_last_value() {
    let observer = ConsoleObserver::new();

    observer.set_busy(true);
    assert!(observer.is_busy());

    observer.on_transition(&TranscriptionState::ConversionFailed(Failure::new(
        FailureKind::Subprocess,
        "exit code 1",
    )));
    observer.set_busy(false);
    assert!(!observer.is_busy());
}
