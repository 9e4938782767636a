mod conversion_policy_test;
mod scratch_path_test;
mod transcription_state_test;
