//! Process-wide logging setup.
//!
//! Console output goes through `tracing_subscriber::fmt` filtered by
//! `RUST_LOG` (default `warden=info`). When `LOG_WEBHOOK_URL` is set, WARN and
//! ERROR events are also forwarded to that webhook by [`webhook::WebhookLayer`].

pub mod webhook;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

const DEFAULT_FILTER: &str = "warden=info";

/// Installs the global subscriber and the panic hook.
///
/// Must run inside the tokio runtime when a webhook is configured, since the
/// forwarder task is spawned here.
pub fn init(webhook_url: Option<Url>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let webhook = webhook_url.map(|url| {
        let (layer, forwarder) = webhook::WebhookLayer::new(url);
        tokio::spawn(forwarder.run());
        layer
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(webhook)
        .init();

    install_panic_hook();
}

/// Routes panics through `tracing` so they reach the console and the webhook.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());

        tracing::error!(location, "Panic: {}", payload);
    }));
}
