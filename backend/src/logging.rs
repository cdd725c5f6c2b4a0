use std::fmt::Write as _;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "warn,backend=info";

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }
}

fn format_line(timestamp: &str, level: &Level, target: &str, message: &str, fields: &str) -> Option<String> {
    if message.is_empty() {
        return None;
    }

    let line = match *level {
        Level::ERROR => format!("[{}] ❌ Error: {} - {}{}", timestamp, target, message, fields),
        Level::WARN => format!("[{}] ⚠️ Warning: {} - {}{}", timestamp, target, message, fields),
        Level::INFO => format!("[{}] ℹ️ {} - {}{}", timestamp, target, message, fields),
        Level::DEBUG if target.contains("service") => {
            format!("[{}] 🔄 {} - {}{}", timestamp, target, message, fields)
        }
        _ => return None,
    };
    Some(line)
}

struct CustomLayer;

impl<S: Subscriber> Layer<S> for CustomLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        if let Some(line) = format_line(&timestamp, metadata.level(), metadata.target(), &visitor.message, &visitor.fields) {
            println!("{}", line);
        }
    }
}

pub fn setup() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = Registry::default().with(env_filter).with(CustomLayer);

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2024-05-01 12:00:00.000";

    #[test]
    fn test_levels_get_their_prefix() {
        assert_eq!(
            format_line(TS, &Level::ERROR, "backend::handlers", "boom", "").as_deref(),
            Some("[2024-05-01 12:00:00.000] ❌ Error: backend::handlers - boom")
        );
        assert_eq!(
            format_line(TS, &Level::INFO, "backend", "listening", " addr=127.0.0.1:3000").as_deref(),
            Some("[2024-05-01 12:00:00.000] ℹ️ backend - listening addr=127.0.0.1:3000")
        );
    }

    #[test]
    fn test_debug_only_for_services() {
        assert!(format_line(TS, &Level::DEBUG, "backend::services::notify_service", "x", "").is_some());
        assert!(format_line(TS, &Level::DEBUG, "backend::handlers", "x", "").is_none());
        assert!(format_line(TS, &Level::TRACE, "backend::services", "x", "").is_none());
    }

    #[test]
    fn test_empty_message_is_skipped() {
        assert!(format_line(TS, &Level::WARN, "backend", "", " a=1").is_none());
    }
}
