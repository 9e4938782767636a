mod tokio_process_runner;

pub use tokio_process_runner::TokioProcessRunner;
