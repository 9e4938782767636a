use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use scribe_relay::application::ports::{ProcessRunner, ScratchStore, ToolInvocation};
use scribe_relay::application::services::ConversionService;
use scribe_relay::infrastructure::conversion::transcoder_config;
use scribe_relay::infrastructure::observability::{TracingConfig, init_tracing};
use scribe_relay::infrastructure::process::TokioProcessRunner;
use scribe_relay::infrastructure::storage::LocalScratchStore;
use scribe_relay::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        &TracingConfig::from_settings(environment, &settings.logging),
        "conversion-service",
    );

    let scratch = LocalScratchStore::new(settings.scratch.resolve_directory())
        .context("Failed to prepare scratch directory")?;
    tracing::info!(directory = %scratch.directory().display(), "Scratch directory ready");
    let scratch: Arc<dyn ScratchStore> = Arc::new(scratch);

    let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner::new());
    check_transcoder(runner.as_ref(), &settings.transcoder.program).await;

    let conversion_service = Arc::new(ConversionService::new(
        Arc::clone(&runner),
        Arc::clone(&scratch),
        transcoder_config(&settings.transcoder),
    ));

    let state = AppState {
        conversion_service,
        default_format: settings.transcoder.default_format,
        max_upload_bytes: settings.server.max_upload_bytes(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server host/port")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn check_transcoder(runner: &dyn ProcessRunner, program: &str) {
    let invocation = ToolInvocation::new(program)
        .arg("-version")
        .timeout(Some(std::time::Duration::from_secs(10)));

    match runner.run(invocation).await {
        Ok(output) if output.success() => {
            let version = output.stdout.lines().next().unwrap_or_default().to_string();
            tracing::info!(program, version = %version, "Transcoder available");
        }
        Ok(output) => {
            tracing::warn!(program, exit_code = ?output.exit_code, "Transcoder check failed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Transcoder not available, conversions will fail");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
