//! Storefront Payments server.
//!
//! Serves the checkout endpoint for the storefront and the Stripe webhook
//! endpoint that sends order notifications.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storefront_payments::adapters::http::{app_router, CheckoutAppState, WebhookAppState};
use storefront_payments::adapters::{
    InMemoryProcessedEventStore, ResendConfig, ResendEmailSender, StripeConfig,
    StripePaymentAdapter,
};
use storefront_payments::application::{CreateCheckoutSessionHandler, HandlePaymentEventHandler};
use storefront_payments::config::{AppConfig, LogFormat};
use storefront_payments::domain::orders::StripeWebhookVerifier;
use storefront_payments::ports::ProcessedEventStore;

/// How long processed event IDs are remembered. Covers Stripe's 3-day retry window.
const PROCESSED_EVENT_RETENTION_DAYS: i64 = 7;

/// How often expired processed-event records are swept.
const RETENTION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Configuration problems must stop the process before it accepts traffic
    let config = AppConfig::load()?;

    init_tracing(&config);

    tracing::info!(
        stripe_live_mode = config.payment.is_live_mode(),
        require_livemode = config.payment.require_livemode,
        deduplicate_webhook_events = config.features.deduplicate_webhook_events,
        "Configuration loaded"
    );

    // Outbound adapters
    let payment_provider = Arc::new(StripePaymentAdapter::new(StripeConfig::from(
        &config.payment,
    ))?);
    let email_sender = Arc::new(ResendEmailSender::new(ResendConfig::from(&config.email))?);

    // Checkout
    let checkout_handler = CreateCheckoutSessionHandler::new(
        payment_provider.clone(),
        config.payment.checkout_settings(),
    )?;

    // Webhooks
    let verifier = StripeWebhookVerifier::new(SecretString::new(
        config.payment.stripe_webhook_secret.clone(),
    ));
    let mut webhook_handler = HandlePaymentEventHandler::new(
        verifier,
        payment_provider,
        email_sender,
        config.email.notification_settings(),
    )
    .with_require_livemode(config.payment.require_livemode);

    if config.features.deduplicate_webhook_events {
        let store: Arc<dyn ProcessedEventStore> = Arc::new(InMemoryProcessedEventStore::new());
        spawn_retention_sweep(store.clone());
        webhook_handler = webhook_handler.with_deduplication(store);
    }

    let app = app_router(
        CheckoutAppState::new(checkout_handler),
        WebhookAppState::new(webhook_handler),
        &config.server,
    );

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("storefront-payments listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Human-readable logs by default, JSON when `server.log_format` is `json`.
///
/// `RUST_LOG` takes precedence over the configured log level.
fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.server.log_format == LogFormat::Json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Periodically forget processed events older than the retention period.
fn spawn_retention_sweep(store: Arc<dyn ProcessedEventStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RETENTION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let cutoff = chrono::Utc::now() - chrono::Duration::days(PROCESSED_EVENT_RETENTION_DAYS);
            match store.delete_before(cutoff).await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Swept processed events"),
                Err(e) => tracing::warn!(error = %e, "Processed event sweep failed"),
            }
        }
    });
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
