use std::fmt::Debug;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{field::Field, Event, Level, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};
use url::Url;

use crate::server::discord::embed::{truncate, Colors};

/// Targets never forwarded: this module, and the HTTP stack it posts with.
const IGNORED_TARGET_PREFIXES: [&str; 4] = [module_path!(), "reqwest", "hyper", "h2"];

/// Discord caps embed descriptions at 4096 characters.
const MAX_DESCRIPTION: usize = 4000;

/// A log event queued for the webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Queues WARN and ERROR events for [`WebhookForwarder`].
pub struct WebhookLayer {
    tx: mpsc::UnboundedSender<LogRecord>,
}

/// Drains queued records and POSTs each one to the webhook.
pub struct WebhookForwarder {
    rx: mpsc::UnboundedReceiver<LogRecord>,
    url: Url,
    client: reqwest::Client,
}

impl WebhookLayer {
    pub fn new(url: Url) -> (Self, WebhookForwarder) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self { tx },
            WebhookForwarder {
                rx,
                url,
                client: reqwest::Client::new(),
            },
        )
    }
}

/// Whether an event at `level` from `target` goes to the webhook.
pub fn should_forward(level: &Level, target: &str) -> bool {
    *level <= Level::WARN
        && !IGNORED_TARGET_PREFIXES
            .iter()
            .any(|prefix| target.starts_with(prefix))
}

impl<S> Layer<S> for WebhookLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !should_forward(metadata.level(), metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        // Receiver gone means the forwarder stopped; the console layer still has the event.
        let _ = self.tx.send(LogRecord {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.finish(),
        });
    }
}

impl WebhookForwarder {
    pub async fn run(mut self) {
        while let Some(record) = self.rx.recv().await {
            let result = self
                .client
                .post(self.url.clone())
                .json(&webhook_payload(&record))
                .send()
                .await
                .and_then(|response| response.error_for_status());

            if let Err(e) = result {
                eprintln!("Failed to forward log event to webhook: {}", e);
            }
        }
    }
}

/// Discord webhook body with the record as a single embed.
pub fn webhook_payload(record: &LogRecord) -> serde_json::Value {
    let color = if record.level == Level::ERROR {
        Colors::ERROR
    } else {
        Colors::WARNING
    };

    json!({
        "embeds": [{
            "title": format!("{} · {}", record.level, record.target),
            "description": format!("```\n{}\n```", truncate(&record.message, MAX_DESCRIPTION)),
            "color": color,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }]
    })
}

/// Collects the message and any structured fields as `key=value` pairs.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{} ({})", self.message, self.fields.join(", "))
        }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
