use std::sync::Arc;

use tokio::io::BufReader;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use airfreight_quote::config::{EmailJsConfig, LogConfig, QuoteConfig};
use airfreight_quote::console::{ConsoleForm, FormOutcome};
use airfreight_quote::notify::{DeliveryPipeline, EmailJsNotifier, Notifier};
use airfreight_quote::quote::QuoteWizard;

/// Log to a daily file when a directory is configured, since stdout
/// belongs to the form. The guard must live until exit to flush.
fn init_tracing(config: &LogConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "airfreight-quote.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_config = LogConfig::from_env();
    let _log_guard = init_tracing(&log_config);

    let emailjs_config = EmailJsConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export EMAILJS_SERVICE_ID=service_...");
        eprintln!("  export EMAILJS_BUSINESS_TEMPLATE_ID=template_...");
        eprintln!("  export EMAILJS_CONFIRMATION_TEMPLATE_ID=template_...");
        eprintln!("  export EMAILJS_PUBLIC_KEY=...");
        std::process::exit(1);
    });
    let quote_config = QuoteConfig::from_env();

    eprintln!("✈️  Airfreight Quote v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Lane: {} → {}", quote_config.origin, quote_config.destination);
    eprintln!("   EmailJS: {}", emailjs_config.api_url);
    if let Some(dir) = &log_config.log_dir {
        eprintln!("   Logs: {}", dir.display());
    }
    eprintln!();

    let notifier: Arc<dyn Notifier> = Arc::new(EmailJsNotifier::new(&emailjs_config));
    let pipeline = DeliveryPipeline::new(notifier, EmailJsNotifier::template_ids(&emailjs_config));
    let mut wizard = QuoteWizard::new(&quote_config, pipeline);

    let mut form = ConsoleForm::new(BufReader::new(tokio::io::stdin()), std::io::stdout());
    match form.run(&mut wizard).await? {
        FormOutcome::Submitted(receipt) => {
            tracing::info!(
                session_id = %receipt.session_id,
                delivered_at = %receipt.delivered_at,
                "Quote request completed"
            );
        }
        FormOutcome::Abandoned => {
            tracing::info!(session_id = %wizard.session_id(), "Quote request abandoned");
        }
    }

    Ok(())
}
