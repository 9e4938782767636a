use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptionResult {
    pub text: String,
}

impl TranscriptionResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
