use anyhow::{Context, Result};
use clap::Parser;
use rf_client::Pipeline;
use rf_server::{
    config::Config,
    routes::{build_router, AppState},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// The address and optionally port to bind to
    #[clap(long, default_value = "0.0.0.0:8000")]
    address: String,

    /// Whether to use HTTPS / TLS (needs TLS_CERT_PATH and TLS_KEY_PATH)
    #[clap(long)]
    tls: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();
    let config = Config::from_env(args.address, args.tls).context("Loading configuration")?;

    // initialize tracing
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "access.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Without an API key every endpoint answers with its offline fallback
    let pipeline = Pipeline::from_config(&config.llm);
    match pipeline.model_name() {
        Some(model) => tracing::info!("Using LLM model {} at {}", model, config.llm.api_base),
        None => tracing::warn!("No LLM API key configured, serving offline fallbacks"),
    }

    let app = build_router(AppState { pipeline }, &config.cors);

    // In development, use HTTP. In production, use HTTPS.
    if let Some(tls) = &config.server.tls {
        rustls::crypto::ring::default_provider()
            .install_default()
            .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;
        let tls_config =
            axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .context("Loading TLS certificate")?;

        let addr = config.server.address.parse()?;
        tracing::info!("Listening on {}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .context("Starting TLS server")?;
    } else {
        let listener = tokio::net::TcpListener::bind(&config.server.address).await?;
        tracing::info!("Listening on {}", config.server.address);
        axum::serve(listener, app).await?;
    }
    Ok(())
}
