use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::application::ports::{ProcessError, ProcessOutput, ProcessRunner, ToolInvocation};
use crate::infrastructure::observability::sanitize_diagnostic;

/// Subprocess execution backed by `tokio::process`.
///
/// The executable is resolved through `PATH` when `program` is a bare name. Stdout and stderr
/// are drained by their own tasks while the exit status is awaited, so a chatty tool can never
/// stall on a full pipe. The child is killed on timeout, on cancellation, and when the returned
/// future is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

fn drain<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut buf).await {
                tracing::debug!(error = %e, "Pipe closed while draining");
            }
        }
        buf
    })
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, invocation: ToolInvocation) -> Result<ProcessOutput, ProcessError> {
        let ToolInvocation {
            program,
            args,
            timeout,
            cancellation,
        } = invocation;
        let start = Instant::now();

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.clone(),
                source,
            })?;

        tracing::debug!(program = %program, args = ?args, pid = ?child.id(), "Spawned process");

        let mut stdout_handle = drain(child.stdout.take());
        let mut stderr_handle = drain(child.stderr.take());

        let deadline = async {
            match timeout {
                Some(after) => tokio::time::sleep(after).await,
                None => std::future::pending::<()>().await,
            }
        };

        // Pipes count as part of the run: a forked helper that inherits them keeps them open
        // after the tool itself has exited.
        let finished = {
            let completion = async {
                let status = child.wait().await;
                let (stdout, stderr) = tokio::join!(&mut stdout_handle, &mut stderr_handle);
                (status, stdout.unwrap_or_default(), stderr.unwrap_or_default())
            };

            tokio::select! {
                outcome = completion => Some(outcome),
                () = deadline => None,
                () = cancellation.cancelled() => None,
            }
        };

        let Some((status, stdout, stderr)) = finished else {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, program = %program, "Failed to kill process");
            }
            stdout_handle.abort();
            stderr_handle.abort();

            if cancellation.is_cancelled() {
                tracing::info!(program = %program, "Process cancelled");
                return Err(ProcessError::Cancelled { program });
            }
            let after = timeout.unwrap_or_default();
            tracing::warn!(program = %program, timeout_secs = after.as_secs(), "Process timed out");
            return Err(ProcessError::TimedOut { program, after });
        };

        let status = status.map_err(|source| ProcessError::Wait {
            program: program.clone(),
            source,
        })?;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let output = ProcessOutput {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            duration_ms,
        };

        if output.success() {
            tracing::debug!(program = %program, duration_ms, "Process completed");
        } else {
            tracing::warn!(
                program = %program,
                exit_code = ?output.exit_code,
                duration_ms,
                stderr = %sanitize_diagnostic(&output.stderr),
                "Process exited unsuccessfully"
            );
        }

        Ok(output)
    }
}
