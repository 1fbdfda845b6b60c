use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;

use contact_desk::config::ContactConfig;
use contact_desk::contact::{
    ContactPipeline, DisabledMailer, FileSink, MailTransport, SmtpMailer, SubmissionSink,
    CONTACT_PATH,
};
use contact_desk::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = ContactConfig::from_env().context("Invalid configuration")?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(config.ops_log_dir.as_deref());

    eprintln!("📬 Contact Desk v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Endpoint: http://{}{}", config.bind_addr, CONTACT_PATH);
    eprintln!("   Submission log: {}", config.log_path.display());
    match &config.static_dir {
        Some(dir) => eprintln!("   Static site: {}", dir.display()),
        None => eprintln!("   Static site: disabled"),
    }

    let transport: Arc<dyn MailTransport> = match &config.smtp {
        Some(smtp) => {
            eprintln!("   SMTP: {}:{}", smtp.host, smtp.port);
            Arc::new(SmtpMailer::new(smtp.clone()))
        }
        None => {
            eprintln!("   SMTP: not configured, emails will not be sent");
            Arc::new(DisabledMailer)
        }
    };
    let sink: Arc<dyn SubmissionSink> = Arc::new(FileSink::new(config.log_path.clone()));
    let pipeline = Arc::new(ContactPipeline::new(sink, transport, config.profile.clone()));

    let app = server::app(pipeline, config.static_dir.as_deref());
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Contact server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Contact server stopped");
    Ok(())
}

/// Stderr logging, plus a file writer when `ops_log_dir` is set.
fn init_tracing(ops_log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match ops_log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, "contact-desk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
