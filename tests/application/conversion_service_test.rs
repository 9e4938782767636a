use std::collections::HashSet;
use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use scribe_relay::application::ports::{AudioConverter, ConversionError};
use scribe_relay::application::services::{ConversionService, TranscoderConfig};
use scribe_relay::domain::{AudioFormat, FailureKind, UploadedArtifact};

use crate::helpers::{ScriptedRunner, ToolBehaviour, scratch_entries, scratch_store};

fn aac_upload() -> UploadedArtifact {
    UploadedArtifact::new(
        "voice.aac",
        Some("audio/aac".to_string()),
        Bytes::from_static(b"\xff\xf1aac-frames"),
    )
}

fn service(runner: Arc<ScriptedRunner>) -> (tempfile::TempDir, ConversionService) {
    let (dir, store) = scratch_store();
    (dir, ConversionService::new(runner, store, TranscoderConfig::default()))
}

#[tokio::test]
async fn given_valid_upload_when_converted_then_returns_transcoder_output() {
    let runner = ScriptedRunner::new(ToolBehaviour::Produce(b"ID3mp3-frames".to_vec()));
    let (dir, service) = service(Arc::clone(&runner));

    let converted = service
        .convert(aac_upload(), AudioFormat::Mp3, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(converted.data, Bytes::from_static(b"ID3mp3-frames"));
    assert_eq!(converted.format, AudioFormat::Mp3);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].input_bytes, b"\xff\xf1aac-frames");
    assert_eq!(calls[0].input_path.extension().unwrap(), "aac");
    assert_eq!(calls[0].output_path.extension().unwrap(), "mp3");
    assert!(calls[0].input_path.starts_with(dir.path()));
    assert!(calls[0].output_path.starts_with(dir.path()));

    assert!(scratch_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn given_mp3_target_when_converted_then_passes_flags_in_order() {
    let runner = ScriptedRunner::new(ToolBehaviour::Produce(b"ID3".to_vec()));
    let (_dir, service) = service(Arc::clone(&runner));

    service
        .convert(aac_upload(), AudioFormat::Mp3, CancellationToken::new())
        .await
        .unwrap();

    let call = &runner.calls()[0];
    let expected: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-nostdin".into(),
        "-i".into(),
        call.input_path.clone().into_os_string(),
        "-b:a".into(),
        "192k".into(),
        "-y".into(),
        call.output_path.clone().into_os_string(),
    ];
    assert_eq!(call.args, expected);
}

#[tokio::test]
async fn given_empty_upload_when_converted_then_rejected_without_running_transcoder() {
    let runner = ScriptedRunner::new(ToolBehaviour::Produce(b"ID3".to_vec()));
    let (dir, service) = service(Arc::clone(&runner));
    let empty = UploadedArtifact::new("voice.aac", None, Bytes::new());

    let err = service
        .convert(empty, AudioFormat::Mp3, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ConversionError::InvalidInput(_)));
    assert_eq!(err.kind(), FailureKind::InvalidInput);
    assert!(runner.calls().is_empty());
    assert!(scratch_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn given_transcoder_fails_when_converted_then_error_carries_stderr_and_exit_code() {
    let runner = ScriptedRunner::new(ToolBehaviour::Fail {
        exit_code: 1,
        stderr: "invalid data found when processing input".to_string(),
    });
    let (dir, service) = service(runner);

    let err = service
        .convert(aac_upload(), AudioFormat::Mp3, CancellationToken::new())
        .await
        .unwrap_err();

    match &err {
        ConversionError::Subprocess { exit_code, stderr } => {
            assert_eq!(*exit_code, Some(1));
            assert!(stderr.contains("invalid data"));
        }
        other => panic!("expected subprocess error, got {:?}", other),
    }
    assert_eq!(err.kind(), FailureKind::Subprocess);
    assert!(err.to_string().contains("exit code 1"));
    assert!(scratch_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn given_transcoder_missing_when_converted_then_tool_unavailable() {
    let runner = ScriptedRunner::new(ToolBehaviour::NotInstalled);
    let (dir, service) = service(runner);

    let err = service
        .convert(aac_upload(), AudioFormat::Mp3, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ConversionError::ToolUnavailable(_)));
    assert!(err.to_string().contains("ffmpeg"));
    assert!(scratch_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn given_transcoder_times_out_when_converted_then_timeout_error() {
    let runner = ScriptedRunner::new(ToolBehaviour::TimeOut);
    let (dir, service) = service(runner);

    let err = service
        .convert(aac_upload(), AudioFormat::Mp3, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ConversionError::Timeout(d) if d == Duration::from_secs(300)));
    assert_eq!(err.kind(), FailureKind::Timeout);
    assert!(scratch_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn given_extensionless_upload_when_converted_then_input_uses_fallback_extension() {
    let runner = ScriptedRunner::new(ToolBehaviour::Produce(b"ID3".to_vec()));
    let (_dir, service) = service(Arc::clone(&runner));
    let upload = UploadedArtifact::new("recording", None, Bytes::from_static(b"data"));

    service
        .convert(upload, AudioFormat::Wav, CancellationToken::new())
        .await
        .unwrap();

    let call = &runner.calls()[0];
    assert_eq!(call.input_path.extension().unwrap(), "bin");
    assert_eq!(call.output_path.extension().unwrap(), "wav");
}

#[tokio::test]
async fn given_concurrent_conversions_when_run_then_scratch_paths_never_collide() {
    let runner = ScriptedRunner::new(ToolBehaviour::Produce(b"ID3".to_vec()));
    let (dir, service) = service(Arc::clone(&runner));
    let service = Arc::new(service);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .convert(aac_upload(), AudioFormat::Mp3, CancellationToken::new())
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let paths: HashSet<_> = runner
        .calls()
        .iter()
        .flat_map(|c| [c.input_path.clone(), c.output_path.clone()])
        .collect();
    assert_eq!(paths.len(), 16);
    assert!(scratch_entries(dir.path()).is_empty());
}

#[cfg(unix)]
mod with_real_process {
    use super::*;
    use scribe_relay::infrastructure::process::TokioProcessRunner;

    const DOUBLING_TRANSCODER: &str = r#"
while [ $# -gt 0 ]; do
  case "$1" in
    -i) input="$2"; shift 2 ;;
    -y) output="$2"; shift 2 ;;
    *) shift ;;
  esac
done
cat "$input" "$input" > "$output"
"#;

    const FAILING_TRANSCODER: &str = r#"
echo "voice.aac: Invalid data found when processing input" >&2
exit 1
"#;

    fn service_with_script(script: &str) -> (tempfile::TempDir, tempfile::TempDir, ConversionService) {
        let tools = tempfile::TempDir::new().unwrap();
        let script_path = tools.path().join("transcoder.sh");
        std::fs::write(&script_path, script).unwrap();

        let (scratch_dir, store) = scratch_store();
        let config = TranscoderConfig {
            program: "sh".to_string(),
            global_args: vec![script_path.to_string_lossy().into_owned()],
            timeout: Some(Duration::from_secs(10)),
        };
        let service = ConversionService::new(Arc::new(TokioProcessRunner::new()), store, config);
        (tools, scratch_dir, service)
    }

    #[tokio::test]
    async fn given_working_transcoder_when_converted_then_returns_its_output() {
        let (_tools, scratch, service) = service_with_script(DOUBLING_TRANSCODER);

        let converted = service
            .convert(aac_upload(), AudioFormat::Mp3, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            converted.data,
            Bytes::from_static(b"\xff\xf1aac-frames\xff\xf1aac-frames")
        );
        assert!(scratch_entries(scratch.path()).is_empty());
    }

    #[tokio::test]
    async fn given_failing_transcoder_when_converted_then_stderr_is_surfaced() {
        let (_tools, scratch, service) = service_with_script(FAILING_TRANSCODER);

        let err = service
            .convert(aac_upload(), AudioFormat::Mp3, CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid data found"));
        assert!(scratch_entries(scratch.path()).is_empty());
    }
}
