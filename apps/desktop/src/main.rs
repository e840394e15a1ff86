use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ConversionController, ConversionService, HttpConversionService, MetricsReporter,
    TimedConversionService, TracingDiagnostics, Validation,
};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod session;

use config::{load_settings, ClientSettings};
use session::Session;

#[derive(Parser, Debug)]
#[command(name = "roman-converter", about = "Convert integers to Roman numerals via a conversion server")]
struct Cli {
    #[arg(long, default_value = "client.toml")]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    report_metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single value.
    Convert {
        value: String,
        /// Print the panel snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Read panel commands from stdin.
    Session,
}

fn init_tracing(settings: &ClientSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config);
    if let Some(server_url) = &cli.server_url {
        settings.set_server_url(server_url);
    }
    if cli.report_metrics {
        settings.report_metrics = true;
    }
    init_tracing(&settings);
    info!(
        server_url = %settings.server_url,
        environment = %settings.environment,
        "client initialized"
    );

    let http = HttpConversionService::new(&settings.server_url, settings.request_timeout())?;
    let timed = if settings.report_metrics {
        let reporter = MetricsReporter::new(&settings.server_url)?;
        Some(Arc::new(TimedConversionService::new(http.clone(), reporter)))
    } else {
        None
    };
    let service: Arc<dyn ConversionService> = match &timed {
        Some(timed) => timed.clone(),
        None => Arc::new(http),
    };
    let diagnostics = Arc::new(TracingDiagnostics::new(settings.log_tag.clone()));

    let outcome = match cli.command {
        Command::Convert { value, json } => convert_once(service, diagnostics, &value, json).await,
        Command::Session => {
            let mut session = Session::new(service, diagnostics);
            session
                .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await
        }
    };

    if let Some(timed) = timed {
        timed.flush().await;
    }
    outcome
}

async fn convert_once(
    service: Arc<dyn ConversionService>,
    diagnostics: Arc<TracingDiagnostics>,
    value: &str,
    json: bool,
) -> Result<()> {
    let controller = ConversionController::new(service, diagnostics);
    if let Validation::Rejected(reason) = controller.on_input_changed(value) {
        bail!("invalid input {value:?}: {reason}");
    }
    controller.submit().await;

    let snapshot = controller.snapshot();
    if json {
        println!(
            "{}",
            serde_json::to_string(&snapshot).context("failed to encode snapshot")?
        );
    } else if let Some(result) = &snapshot.result_text {
        println!("{result}");
    }

    if let Some(error) = snapshot.error_text {
        bail!(error);
    }
    Ok(())
}
