use anyhow::Context;

use frustration_triage::config::TriageConfig;
use frustration_triage::http::{AppState, triage_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = TriageConfig::from_env().context("invalid TRIAGE_* configuration")?;

    eprintln!("Frustration triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model_dir.display());
    eprintln!(
        "   Weights: custom {} / oracle {}",
        config.weights.custom(),
        config.weights.oracle()
    );
    eprintln!(
        "   Oracle: {} {} (timeout {:?}, retries {})",
        config.oracle_program,
        config.oracle_script.display(),
        config.oracle_timeout,
        config.oracle_retries
    );
    match &config.maildir {
        Some(dir) => eprintln!("   Inbox: {} (max {} per run)", dir.display(), config.max_results),
        None => eprintln!("   Inbox: none (GET /frustration/emails disabled)"),
    }

    let state = AppState::from_config(&config).context("failed to initialise pipeline")?;
    let app = triage_routes(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Triage server started");
    axum::serve(listener, app).await?;

    Ok(())
}
