use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use scribe_relay::application::ports::{ProcessRunner, ScratchStore};
use scribe_relay::application::services::TranscriptionOrchestrator;
use scribe_relay::domain::AudioArtifact;
use scribe_relay::infrastructure::audio::OpenAiWhisperEngine;
use scribe_relay::infrastructure::conversion::ConverterFactory;
use scribe_relay::infrastructure::observability::{TracingConfig, init_tracing};
use scribe_relay::infrastructure::process::TokioProcessRunner;
use scribe_relay::infrastructure::storage::LocalScratchStore;
use scribe_relay::presentation::{ConsoleObserver, ConversionMode, Environment, Settings};

/// Transcribe an audio file, converting it first when the endpoint cannot read its format.
#[derive(Debug, Parser)]
#[command(name = "transcribe", version)]
struct Args {
    /// Audio file to transcribe.
    file: PathBuf,

    /// Content type to declare for the file; guessed from the extension when omitted.
    #[arg(long)]
    content_type: Option<String>,

    /// Where conversions run: `local` uses the transcoder on this machine, `remote` the
    /// conversion service.
    #[arg(long)]
    conversion: Option<ConversionMode>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        &TracingConfig::from_settings(environment, &settings.logging),
        "transcribe",
    );

    let transcription = &settings.client.transcription;
    if transcription.api_key.trim().is_empty() {
        bail!("No transcription API key configured; set APP__CLIENT__TRANSCRIPTION__API_KEY");
    }

    if !args.file.is_file() {
        bail!("{} is not a readable file", args.file.display());
    }

    let scratch: Arc<dyn ScratchStore> = Arc::new(
        LocalScratchStore::new(settings.scratch.resolve_directory())
            .context("Failed to prepare scratch directory")?,
    );
    let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner::new());

    let mode = args.conversion.unwrap_or(settings.client.conversion.mode);
    let converter = ConverterFactory::create(
        mode,
        &settings.client.conversion,
        &settings.transcoder,
        runner,
        Arc::clone(&scratch),
    )
    .context("Failed to build conversion client")?;

    let engine = Arc::new(
        OpenAiWhisperEngine::new(
            transcription.endpoint(),
            transcription.api_key.clone(),
            transcription.model.clone(),
            transcription.timeout(),
        )
        .context("Failed to build transcription client")?,
    );

    let orchestrator = TranscriptionOrchestrator::new(
        converter,
        engine,
        scratch,
        settings.client.conversion.policy(),
        Arc::new(ConsoleObserver::new()),
    );

    let cancellation = CancellationToken::new();
    let on_ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Cancelling transcription");
            on_ctrl_c.cancel();
        }
    });

    let artifact = AudioArtifact::new(args.file, args.content_type);
    eprintln!("Selected file: {}", artifact.filename);

    let result = orchestrator.transcribe(&artifact, cancellation).await?;
    println!("{}", result.text);

    Ok(())
}
